pub mod login;
pub mod main_window;
pub mod register;
pub mod shop_form;
