use glib::MainContext;
use once_cell::sync::Lazy;

pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

pub fn spawn_async<F>(fut: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    RUNTIME.spawn(fut);
}

pub fn glib_channel<T: Send + 'static>() -> (glib::Sender<T>, glib::Receiver<T>) {
    MainContext::channel(glib::Priority::default())
}

/// Run a fallible future on the tokio runtime and deliver its result back to
/// the GTK main loop. Attach to the returned receiver to consume the result.
pub fn run_async_to_main<T, E, Fut>(fut: Fut) -> glib::Receiver<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
    Fut: std::future::Future<Output = Result<T, E>> + Send + 'static,
{
    let (tx, rx) = glib_channel::<Result<T, E>>();
    spawn_async(async move {
        let res = fut.await;
        let _ = tx.send(res);
    });
    rx
}

pub fn normalize_base_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Coordinate pair for display in the add-shop form.
pub fn fmt_coord(lat: f64, lng: f64) -> String {
    format!("{:.5}, {:.5}", lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme_and_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url("myserver.example:3000/"),
            "https://myserver.example:3000"
        );
        assert_eq!(
            normalize_base_url("  http://127.0.0.1:3000  "),
            "http://127.0.0.1:3000"
        );
    }

    #[test]
    fn fmt_coord_is_five_decimals() {
        assert_eq!(fmt_coord(31.488, 74.343), "31.48800, 74.34300");
    }
}
