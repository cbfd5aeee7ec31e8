use std::rc::Rc;

use adw::prelude::*;
use gtk4 as gtk;

use crate::app::AppHandle;

const ROLE_CHOICES: [&str; 2] = ["user", "provider"];

/// Modal registration dialog: credentials, a role choice and the security
/// question/answer pair the backend stores for account recovery. Same
/// success contract as login.
pub fn show_register_dialog(
    parent: &adw::ApplicationWindow,
    overlay: &adw::ToastOverlay,
    app: AppHandle,
    on_success: Rc<dyn Fn()>,
) {
    let dialog = gtk::Dialog::builder()
        .title("Create Account")
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
    content.append(&user_entry);

    let pass_entry = gtk::PasswordEntry::new();
    pass_entry.set_placeholder_text(Some("Password"));
    pass_entry.set_hexpand(true);
    content.append(&pass_entry);

    let role_row = gtk::Box::new(gtk::Orientation::Horizontal, 8);
    let role_label = gtk::Label::new(Some("Account type:"));
    role_label.set_halign(gtk::Align::Start);
    role_row.append(&role_label);
    let role_dropdown = gtk::DropDown::from_strings(&ROLE_CHOICES);
    role_dropdown.set_hexpand(true);
    role_row.append(&role_dropdown);
    content.append(&role_row);

    let question_entry = gtk::Entry::new();
    question_entry.set_placeholder_text(Some("Security question"));
    question_entry.set_hexpand(true);
    content.append(&question_entry);

    let answer_entry = gtk::Entry::new();
    answer_entry.set_placeholder_text(Some("Security answer"));
    answer_entry.set_hexpand(true);
    content.append(&answer_entry);

    let status = gtk::Label::new(None);
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    content.append(&status);

    dialog.set_child(Some(&content));
    let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let register_btn = dialog.add_button("Register", gtk::ResponseType::Ok);
    register_btn.add_css_class("suggested-action");
    dialog.set_default_response(gtk::ResponseType::Ok);

    let overlay = overlay.clone();
    dialog.connect_response(move |dlg, resp| {
        if resp != gtk::ResponseType::Ok {
            dlg.close();
            return;
        }

        let username = user_entry.text().trim().to_string();
        let password = pass_entry.text().to_string();
        let question = question_entry.text().trim().to_string();
        let answer = answer_entry.text().trim().to_string();
        let role = ROLE_CHOICES
            .get(role_dropdown.selected() as usize)
            .copied()
            .unwrap_or("user")
            .to_string();

        if username.is_empty() || password.is_empty() {
            overlay.add_toast(adw::Toast::new("Please enter username and password."));
            return;
        }

        status.set_label("Creating account…");

        let client = app.client.clone();
        let rx = crate::utils::run_async_to_main(async move {
            client
                .register(&username, &password, &role, &question, &answer)
                .await
        });

        let app = app.clone();
        let overlay = overlay.clone();
        let status = status.clone();
        let dlg = dlg.clone();
        let on_success = on_success.clone();
        rx.attach(None, move |res| {
            match res {
                Ok(session) => {
                    app.set_session(session);
                    overlay.add_toast(adw::Toast::new("Account created."));
                    dlg.close();
                    (on_success)();
                }
                Err(err) => {
                    status.set_label(&err.user_message("Registration failed"));
                }
            }
            glib::ControlFlow::Continue
        });
    });

    dialog.present();
}
