use std::cell::RefCell;
use std::rc::Rc;

use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;

use crate::api::models::{ServiceRequest, Shop};
use crate::app::AppHandle;
use crate::capability;
use crate::map_view::{self, MapView};

pub fn show_main_window(app: &Application, handle: AppHandle) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("ServicePro")
        .default_width(960)
        .default_height(640)
        .build();

    let overlay = adw::ToastOverlay::new();

    let map_view = Rc::new(MapView::new(
        (handle.config.center_lat, handle.config.center_lng),
        handle.config.zoom,
    ));
    overlay.set_child(Some(&map_view.widget()));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(Some("ServicePro"));
    header.set_title_widget(Some(&title));

    let add_shop_btn = gtk::Button::with_label("Add Shop");
    add_shop_btn.add_css_class("suggested-action");
    header.pack_end(&add_shop_btn);
    let logout_btn = gtk::Button::with_label("Logout");
    header.pack_end(&logout_btn);
    let register_btn = gtk::Button::with_label("Register");
    header.pack_end(&register_btn);
    let login_btn = gtk::Button::with_label("Login");
    header.pack_end(&login_btn);

    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));
    window.present();

    // Header buttons follow the current session: login/register while
    // anonymous, logout (named) and the role-gated add-shop otherwise.
    let update_header: Rc<dyn Fn()> = {
        let handle = handle.clone();
        let login_btn = login_btn.clone();
        let register_btn = register_btn.clone();
        let logout_btn = logout_btn.clone();
        let add_shop_btn = add_shop_btn.clone();
        Rc::new(move || {
            let session = handle.session();
            let logged_in = session.is_some();
            login_btn.set_visible(!logged_in);
            register_btn.set_visible(!logged_in);
            logout_btn.set_visible(logged_in);
            if let Some(session) = &session {
                logout_btn.set_label(&format!("Logout ({})", session.username));
            }
            add_shop_btn.set_visible(capability::can_add_shop(session.as_ref()));
        })
    };

    // The refresh closure needs to hand itself to the per-marker delete flow,
    // so it lives behind a slot filled in right after construction.
    let refresh_slot: Rc<RefCell<Option<Rc<dyn Fn()>>>> = Rc::new(RefCell::new(None));
    let refresh_again: Rc<dyn Fn()> = {
        let slot = refresh_slot.clone();
        Rc::new(move || {
            let current = slot.borrow().clone();
            if let Some(refresh) = current {
                refresh();
            }
        })
    };

    let refresh: Rc<dyn Fn()> = {
        let handle = handle.clone();
        let map_view = Rc::downgrade(&map_view);
        let overlay = overlay.clone();
        let window = window.clone();
        let refresh_again = refresh_again.clone();
        Rc::new(move || {
            let client = handle.client.clone();
            let rx = crate::utils::run_async_to_main(async move { client.shops().await });

            let handle = handle.clone();
            let map_view = map_view.clone();
            let overlay = overlay.clone();
            let window = window.clone();
            let refresh_again = refresh_again.clone();
            rx.attach(None, move |res| {
                let Some(map_view) = map_view.upgrade() else {
                    return glib::ControlFlow::Break;
                };
                // Fetch failures never surface to the user; the map just
                // shows nothing until the next refresh.
                let shops = match res {
                    Ok(shops) => shops,
                    Err(err) => {
                        log::warn!("failed to load shops: {err}");
                        Vec::new()
                    }
                };
                let session = handle.session();
                let specs = map_view::project_markers(&shops, session.as_ref());

                let on_request: Rc<dyn Fn(Shop)> = {
                    let handle = handle.clone();
                    let overlay = overlay.clone();
                    let window = window.clone();
                    Rc::new(move |shop| {
                        show_request_dialog(&window, &overlay, handle.clone(), shop);
                    })
                };
                let on_delete: Rc<dyn Fn(Shop)> = {
                    let handle = handle.clone();
                    let overlay = overlay.clone();
                    let window = window.clone();
                    let refresh_again = refresh_again.clone();
                    Rc::new(move |shop| {
                        show_delete_confirm(
                            &window,
                            &overlay,
                            handle.clone(),
                            shop,
                            refresh_again.clone(),
                        );
                    })
                };
                map_view.render(specs, on_request, on_delete);
                glib::ControlFlow::Continue
            });
        })
    };
    *refresh_slot.borrow_mut() = Some(refresh.clone());

    // Map clicks: only providers and admins pick locations; everyone else's
    // clicks fall through to the map.
    {
        let handle = handle.clone();
        let overlay = overlay.clone();
        let window = window.clone();
        let map_view_weak = Rc::downgrade(&map_view);
        let refresh = refresh.clone();
        map_view.connect_click(move |lat, lng| {
            let session = handle.session();
            if !capability::can_pick_location(session.as_ref()) {
                return;
            }
            let Some(map_view) = map_view_weak.upgrade() else {
                return;
            };
            map_view.set_temp_marker(lat, lng);

            let on_created: Rc<dyn Fn()> = {
                let map_view = Rc::downgrade(&map_view);
                let refresh = refresh.clone();
                Rc::new(move || {
                    if let Some(map_view) = map_view.upgrade() {
                        map_view.clear_temp_marker();
                    }
                    refresh();
                })
            };
            crate::ui::shop_form::show_shop_form(
                &window,
                &overlay,
                handle.clone(),
                (lat, lng),
                on_created,
            );
        });
    }

    {
        let window = window.clone();
        let overlay = overlay.clone();
        let handle = handle.clone();
        let update_header = update_header.clone();
        let refresh = refresh.clone();
        login_btn.connect_clicked(move |_| {
            let on_success: Rc<dyn Fn()> = {
                let update_header = update_header.clone();
                let refresh = refresh.clone();
                Rc::new(move || {
                    update_header();
                    refresh();
                })
            };
            crate::ui::login::show_login_dialog(&window, &overlay, handle.clone(), on_success);
        });
    }

    {
        let window = window.clone();
        let overlay = overlay.clone();
        let handle = handle.clone();
        let update_header = update_header.clone();
        let refresh = refresh.clone();
        register_btn.connect_clicked(move |_| {
            let on_success: Rc<dyn Fn()> = {
                let update_header = update_header.clone();
                let refresh = refresh.clone();
                Rc::new(move || {
                    update_header();
                    refresh();
                })
            };
            crate::ui::register::show_register_dialog(
                &window,
                &overlay,
                handle.clone(),
                on_success,
            );
        });
    }

    {
        let overlay = overlay.clone();
        let handle = handle.clone();
        let update_header = update_header.clone();
        let refresh = refresh.clone();
        logout_btn.connect_clicked(move |_| {
            handle.clear_session();
            overlay.add_toast(adw::Toast::new("Logged out."));
            update_header();
            refresh();
        });
    }

    {
        let overlay = overlay.clone();
        add_shop_btn.connect_clicked(move |_| {
            overlay.add_toast(adw::Toast::new(
                "Click on the map to set your shop location.",
            ));
        });
    }

    update_header();
    refresh();
}

/// Address prompt for a service request. An empty or cancelled address drops
/// the request without any notification.
fn show_request_dialog(
    window: &adw::ApplicationWindow,
    overlay: &adw::ToastOverlay,
    handle: AppHandle,
    shop: Shop,
) {
    let Some(session) = handle.session() else {
        overlay.add_toast(adw::Toast::new("Please login to request service."));
        return;
    };

    let dialog = gtk::Dialog::builder()
        .title("Request Service")
        .transient_for(window)
        .modal(true)
        .build();

    let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content.set_margin_start(12);
    content.set_margin_end(12);

    let info = gtk::Label::new(Some(&format!("Requesting service from {}.", shop.name)));
    info.set_halign(gtk::Align::Start);
    content.append(&info);

    let address_entry = gtk::Entry::new();
    address_entry.set_placeholder_text(Some("Your address"));
    address_entry.set_hexpand(true);
    address_entry.set_activates_default(true);
    content.append(&address_entry);

    dialog.set_child(Some(&content));
    let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let send_btn = dialog.add_button("Send", gtk::ResponseType::Ok);
    send_btn.add_css_class("suggested-action");
    dialog.set_default_response(gtk::ResponseType::Ok);

    let overlay = overlay.clone();
    let center = (handle.config.center_lat, handle.config.center_lng);
    dialog.connect_response(move |dlg, resp| {
        if resp == gtk::ResponseType::Ok {
            let address = address_entry.text().trim().to_string();
            if address.is_empty() {
                dlg.close();
                return;
            }

            // The shop id goes out as providerId, with placeholder contact
            // details and the default-center coordinates; this is the request
            // format the backend expects.
            let request = ServiceRequest {
                provider_id: shop.id,
                name: session.username.clone(),
                phone: "000-0000".into(),
                address,
                lat: center.0,
                lng: center.1,
            };

            let client = handle.client.clone();
            let rx = crate::utils::run_async_to_main(async move {
                client.request_service(&request).await
            });

            let overlay = overlay.clone();
            let shop_name = shop.name.clone();
            rx.attach(None, move |res| {
                match res {
                    Ok(()) => {
                        overlay
                            .add_toast(adw::Toast::new(&format!("Request sent to {}.", shop_name)));
                    }
                    Err(err) => {
                        overlay.add_toast(adw::Toast::new(
                            &err.user_message("Failed to send request."),
                        ));
                    }
                }
                glib::ControlFlow::Continue
            });
        }
        dlg.close();
    });

    dialog.present();
}

/// Interactive confirmation before a delete; declining sends nothing.
fn show_delete_confirm(
    window: &adw::ApplicationWindow,
    overlay: &adw::ToastOverlay,
    handle: AppHandle,
    shop: Shop,
    on_done: Rc<dyn Fn()>,
) {
    let dialog = gtk::Dialog::builder()
        .title("Delete Shop")
        .transient_for(window)
        .modal(true)
        .build();

    let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content.set_margin_start(12);
    content.set_margin_end(12);

    let question = gtk::Label::new(Some(&format!(
        "Are you sure you want to delete \"{}\"?",
        shop.name
    )));
    question.set_halign(gtk::Align::Start);
    content.append(&question);

    dialog.set_child(Some(&content));
    let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let delete_btn = dialog.add_button("Delete", gtk::ResponseType::Ok);
    delete_btn.add_css_class("destructive-action");

    let overlay = overlay.clone();
    dialog.connect_response(move |dlg, resp| {
        if resp == gtk::ResponseType::Ok {
            let client = handle.client.clone();
            let shop_id = shop.id;
            let rx = crate::utils::run_async_to_main(async move {
                client.delete_shop(shop_id).await
            });

            let overlay = overlay.clone();
            let on_done = on_done.clone();
            rx.attach(None, move |res| {
                match res {
                    Ok(()) => {
                        overlay.add_toast(adw::Toast::new("Shop deleted."));
                        (on_done)();
                    }
                    Err(err) => {
                        overlay.add_toast(adw::Toast::new(
                            &err.user_message("Failed to delete shop."),
                        ));
                    }
                }
                glib::ControlFlow::Continue
            });
        }
        dlg.close();
    });

    dialog.present();
}
