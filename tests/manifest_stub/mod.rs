use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Serves fixed bodies by path; everything else is a 404.
pub struct ManifestStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ManifestStub {
    pub fn spawn(routes: &[(&str, &str)]) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start manifest stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/reader/");

        let routes: HashMap<String, String> = routes
            .iter()
            .map(|(path, body)| ((*path).to_owned(), (*body).to_owned()))
            .collect();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request.url().to_string();
                let response = match routes.get(&path) {
                    Some(body) => tiny_http::Response::from_string(body.clone())
                        .with_header(
                            "Content-Type: application/json"
                                .parse::<tiny_http::Header>()
                                .expect("static header"),
                        )
                        .with_status_code(200),
                    None => tiny_http::Response::from_string("not found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for ManifestStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
