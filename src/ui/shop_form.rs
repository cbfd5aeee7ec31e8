use std::rc::Rc;

use adw::prelude::*;
use gtk4 as gtk;

use crate::api::models::NewShop;
use crate::app::AppHandle;

/// The add-shop dialog. It can only be opened with a picked coordinate, so a
/// create request is never sent without one; the pick is shown read-only.
pub fn show_shop_form(
    parent: &adw::ApplicationWindow,
    overlay: &adw::ToastOverlay,
    app: AppHandle,
    pick: (f64, f64),
    on_created: Rc<dyn Fn()>,
) {
    let dialog = gtk::Dialog::builder()
        .title("Add Shop")
        .transient_for(parent)
        .modal(true)
        .build();

    let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content.set_margin_start(12);
    content.set_margin_end(12);

    let location = gtk::Label::new(Some(&format!(
        "Location: {}",
        crate::utils::fmt_coord(pick.0, pick.1)
    )));
    location.add_css_class("dim-label");
    location.set_halign(gtk::Align::Start);
    content.append(&location);

    let name_entry = gtk::Entry::new();
    name_entry.set_placeholder_text(Some("Shop name"));
    name_entry.set_hexpand(true);
    content.append(&name_entry);

    let service_entry = gtk::Entry::new();
    service_entry.set_placeholder_text(Some("Service offered"));
    service_entry.set_hexpand(true);
    content.append(&service_entry);

    let phone_entry = gtk::Entry::new();
    phone_entry.set_placeholder_text(Some("Phone"));
    phone_entry.set_hexpand(true);
    content.append(&phone_entry);

    let address_entry = gtk::Entry::new();
    address_entry.set_placeholder_text(Some("Address"));
    address_entry.set_hexpand(true);
    content.append(&address_entry);

    let desc_entry = gtk::Entry::new();
    desc_entry.set_placeholder_text(Some("Description"));
    desc_entry.set_hexpand(true);
    content.append(&desc_entry);

    dialog.set_child(Some(&content));
    let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let save_btn = dialog.add_button("Save", gtk::ResponseType::Ok);
    save_btn.add_css_class("suggested-action");
    dialog.set_default_response(gtk::ResponseType::Ok);

    let overlay = overlay.clone();
    dialog.connect_response(move |dlg, resp| {
        if resp != gtk::ResponseType::Ok {
            dlg.close();
            return;
        }

        let Some(session) = app.session() else {
            overlay.add_toast(adw::Toast::new("Please login first."));
            return;
        };

        let name = name_entry.text().trim().to_string();
        let service = service_entry.text().trim().to_string();
        if name.is_empty() || service.is_empty() {
            overlay.add_toast(adw::Toast::new("Please enter a name and a service."));
            return;
        }

        let shop = NewShop {
            owner_id: session.id,
            name,
            service,
            phone: phone_entry.text().trim().to_string(),
            address: address_entry.text().trim().to_string(),
            description: desc_entry.text().trim().to_string(),
            lat: pick.0,
            lng: pick.1,
        };

        let client = app.client.clone();
        let rx =
            crate::utils::run_async_to_main(async move { client.create_shop(&shop).await });

        let overlay = overlay.clone();
        let dlg = dlg.clone();
        let on_created = on_created.clone();
        rx.attach(None, move |res| {
            match res {
                Ok(()) => {
                    overlay.add_toast(adw::Toast::new("Shop added."));
                    dlg.close();
                    (on_created)();
                }
                Err(err) => {
                    overlay.add_toast(adw::Toast::new(
                        &err.user_message("Failed to save shop."),
                    ));
                }
            }
            glib::ControlFlow::Continue
        });
    });

    dialog.present();
}
