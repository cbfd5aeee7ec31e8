use std::rc::Rc;

use adw::prelude::*;
use gtk4 as gtk;

use crate::app::AppHandle;

/// Modal login dialog. On success the session is stored and persisted, the
/// dialog closes and `on_success` runs; on rejection the dialog stays open
/// with the server's message in the status line.
pub fn show_login_dialog(
    parent: &adw::ApplicationWindow,
    overlay: &adw::ToastOverlay,
    app: AppHandle,
    on_success: Rc<dyn Fn()>,
) {
    let dialog = gtk::Dialog::builder()
        .title("Login")
        .transient_for(parent)
        .modal(true)
        .build();

    let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content.set_margin_start(12);
    content.set_margin_end(12);

    let user_entry = gtk::Entry::new();
    user_entry.set_placeholder_text(Some("Username"));
    user_entry.set_hexpand(true);
    user_entry.set_activates_default(true);
    content.append(&user_entry);

    let pass_entry = gtk::PasswordEntry::new();
    pass_entry.set_placeholder_text(Some("Password"));
    pass_entry.set_hexpand(true);
    pass_entry.set_activates_default(true);
    content.append(&pass_entry);

    let status = gtk::Label::new(None);
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    content.append(&status);

    dialog.set_child(Some(&content));
    let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let login_btn = dialog.add_button("Login", gtk::ResponseType::Ok);
    login_btn.add_css_class("suggested-action");
    dialog.set_default_response(gtk::ResponseType::Ok);

    let overlay = overlay.clone();
    dialog.connect_response(move |dlg, resp| {
        if resp != gtk::ResponseType::Ok {
            dlg.close();
            return;
        }

        let username = user_entry.text().trim().to_string();
        let password = pass_entry.text().to_string();
        if username.is_empty() || password.is_empty() {
            overlay.add_toast(adw::Toast::new("Please enter username and password."));
            return;
        }

        status.set_label("Signing in…");

        let client = app.client.clone();
        let rx = crate::utils::run_async_to_main(async move {
            client.login(&username, &password).await
        });

        let app = app.clone();
        let overlay = overlay.clone();
        let status = status.clone();
        let dlg = dlg.clone();
        let on_success = on_success.clone();
        rx.attach(None, move |res| {
            match res {
                Ok(session) => {
                    let greeting = format!("Welcome back, {}!", session.role.as_str());
                    app.set_session(session);
                    overlay.add_toast(adw::Toast::new(&greeting));
                    dlg.close();
                    (on_success)();
                }
                Err(err) => {
                    status.set_label(&err.user_message("Login failed"));
                }
            }
            glib::ControlFlow::Continue
        });
    });

    dialog.present();
}
