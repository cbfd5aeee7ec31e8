use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use shumate::prelude::*;

use crate::api::models::{Session, Shop};
use crate::capability;

/// View-only projection of one shop: everything the widget layer needs to
/// draw a pin and its popup, with the capability questions already answered.
#[derive(Debug, Clone)]
pub struct MarkerSpec {
    pub shop: Shop,
    pub title: String,
    pub summary: String,
    pub can_request: bool,
    pub can_delete: bool,
}

fn popup_summary(shop: &Shop) -> String {
    format!(
        "Service: {}\nPhone: {}\n\n{}",
        shop.service, shop.phone, shop.description
    )
}

/// Project the fetched shop list against the current session. One spec per
/// shop, in fetch order; the render pass replaces every previous marker, so
/// this is the whole picture.
pub fn project_markers(shops: &[Shop], session: Option<&Session>) -> Vec<MarkerSpec> {
    shops
        .iter()
        .map(|shop| MarkerSpec {
            title: shop.name.clone(),
            summary: popup_summary(shop),
            can_request: capability::can_request_service(session),
            can_delete: capability::can_delete_shop(session, shop),
            shop: shop.clone(),
        })
        .collect()
}

/// The map itself: a libshumate widget with one layer for shop pins and one
/// for the single temporary location-pick pin.
pub struct MapView {
    simple: shumate::SimpleMap,
    shop_layer: shumate::MarkerLayer,
    temp_layer: shumate::MarkerLayer,
}

impl MapView {
    pub fn new(center: (f64, f64), zoom: f64) -> Self {
        let simple = shumate::SimpleMap::new();

        let registry = shumate::MapSourceRegistry::with_defaults();
        if let Some(source) = registry.by_id(shumate::MAP_SOURCE_OSM_MAPNIK) {
            simple.set_map_source(Some(&source));
        }

        let viewport = simple.viewport();
        viewport.set_zoom_level(zoom);
        viewport.set_location(center.0, center.1);

        let shop_layer = shumate::MarkerLayer::new(&viewport);
        simple.add_overlay_layer(&shop_layer);
        let temp_layer = shumate::MarkerLayer::new(&viewport);
        simple.add_overlay_layer(&temp_layer);

        Self {
            simple,
            shop_layer,
            temp_layer,
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.simple.clone().upcast()
    }

    /// Full replace: drop every existing pin, then build one per spec. The
    /// popup carries the role-conditional action buttons.
    pub fn render(
        &self,
        specs: Vec<MarkerSpec>,
        on_request: Rc<dyn Fn(Shop)>,
        on_delete: Rc<dyn Fn(Shop)>,
    ) {
        self.shop_layer.remove_all();
        for spec in specs {
            let marker = shumate::Marker::new();
            marker.set_location(spec.shop.lat, spec.shop.lng);
            marker.set_child(Some(&Self::build_pin(
                &spec,
                on_request.clone(),
                on_delete.clone(),
            )));
            self.shop_layer.add_marker(&marker);
        }
    }

    fn build_pin(
        spec: &MarkerSpec,
        on_request: Rc<dyn Fn(Shop)>,
        on_delete: Rc<dyn Fn(Shop)>,
    ) -> gtk::Widget {
        let content = gtk::Box::new(gtk::Orientation::Vertical, 6);
        content.set_margin_top(8);
        content.set_margin_bottom(8);
        content.set_margin_start(8);
        content.set_margin_end(8);

        let title = gtk::Label::new(Some(&spec.title));
        title.add_css_class("heading");
        title.set_halign(gtk::Align::Start);
        content.append(&title);

        let summary = gtk::Label::new(Some(&spec.summary));
        summary.set_halign(gtk::Align::Start);
        summary.set_wrap(true);
        summary.set_max_width_chars(36);
        content.append(&summary);

        let popover = gtk::Popover::new();

        if spec.can_request {
            let request_btn = gtk::Button::with_label("Request Service");
            request_btn.add_css_class("suggested-action");
            let shop = spec.shop.clone();
            let popover_for_request = popover.clone();
            request_btn.connect_clicked(move |_| {
                popover_for_request.popdown();
                (on_request)(shop.clone());
            });
            content.append(&request_btn);
        }

        if spec.can_delete {
            let delete_btn = gtk::Button::with_label("Delete");
            delete_btn.add_css_class("destructive-action");
            let shop = spec.shop.clone();
            let popover_for_delete = popover.clone();
            delete_btn.connect_clicked(move |_| {
                popover_for_delete.popdown();
                (on_delete)(shop.clone());
            });
            content.append(&delete_btn);
        }

        popover.set_child(Some(&content));

        let pin = gtk::MenuButton::new();
        pin.set_icon_name("mark-location-symbolic");
        pin.add_css_class("osd");
        pin.set_popover(Some(&popover));
        pin.upcast()
    }

    /// Route map clicks to the controller as geographic coordinates. The
    /// controller decides whether the current session may pick at all.
    pub fn connect_click<F: Fn(f64, f64) + 'static>(&self, handler: F) {
        let gesture = gtk::GestureClick::new();
        let viewport = self.simple.viewport();
        let widget = self.simple.clone();
        gesture.connect_released(move |_, _, x, y| {
            let (lat, lng) = viewport.widget_coords_to_location(&widget, x, y);
            handler(lat, lng);
        });
        self.simple.add_controller(gesture);
    }

    /// Place the single temporary pick pin, replacing any previous one.
    pub fn set_temp_marker(&self, lat: f64, lng: f64) {
        self.temp_layer.remove_all();
        let label = gtk::Label::new(Some("New shop location"));
        label.add_css_class("osd");
        label.add_css_class("heading");
        let marker = shumate::Marker::new();
        marker.set_location(lat, lng);
        marker.set_child(Some(&label));
        self.temp_layer.add_marker(&marker);
    }

    pub fn clear_temp_marker(&self) {
        self.temp_layer.remove_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Role;

    fn shop(id: i64, owner_id: i64, name: &str) -> Shop {
        Shop {
            id,
            owner_id,
            name: name.into(),
            service: "Plumbing".into(),
            phone: "0300-1234567".into(),
            address: "12 Canal Rd".into(),
            description: "Taps and pipes".into(),
            lat: 31.52,
            lng: 74.35,
        }
    }

    fn session(id: i64, username: &str, role: Role) -> Session {
        Session {
            id,
            username: username.into(),
            role,
        }
    }

    #[test]
    fn one_spec_per_shop() {
        let shops = vec![shop(1, 1, "A"), shop(2, 1, "B"), shop(3, 2, "C")];
        let specs = project_markers(&shops, None);
        assert_eq!(specs.len(), shops.len());
    }

    #[test]
    fn anonymous_gets_no_actions() {
        let specs = project_markers(&[shop(1, 1, "A")], None);
        assert!(!specs[0].can_request);
        assert!(!specs[0].can_delete);
    }

    #[test]
    fn user_role_gets_request_only() {
        let alice = session(7, "alice", Role::User);
        let specs = project_markers(&[shop(1, 1, "A")], Some(&alice));
        assert!(specs[0].can_request);
        assert!(!specs[0].can_delete);
    }

    #[test]
    fn delete_only_on_own_shops_or_admin_account() {
        let bob = session(1, "bob", Role::Provider);
        let shops = vec![shop(10, 1, "Bob's"), shop(11, 2, "Eve's")];
        let specs = project_markers(&shops, Some(&bob));
        assert!(specs[0].can_delete);
        assert!(!specs[1].can_delete);

        let admin = session(99, "admin", Role::Admin);
        let specs = project_markers(&shops, Some(&admin));
        assert!(specs.iter().all(|s| s.can_delete));
    }

    #[test]
    fn summary_carries_service_phone_description() {
        let specs = project_markers(&[shop(1, 1, "Fix-It")], None);
        assert_eq!(specs[0].title, "Fix-It");
        assert!(specs[0].summary.contains("Plumbing"));
        assert!(specs[0].summary.contains("0300-1234567"));
        assert!(specs[0].summary.contains("Taps and pipes"));
    }
}
