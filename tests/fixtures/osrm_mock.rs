//! Wiremock stand-in for an OSRM table service.
//!
//! The client under test is blocking, so the server is driven from a runtime
//! owned by the fixture instead of `#[tokio::test]`.

use std::time::Duration;

use tokio::runtime::Runtime;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eta_grid::osrm::{OsrmClient, OsrmConfig};

pub struct OsrmMock {
    pub server: MockServer,
    pub rt: Runtime,
}

impl OsrmMock {
    pub fn start() -> Self {
        let rt = Runtime::new().expect("tokio runtime");
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    /// Answer every table request with `template`.
    pub fn respond(&self, template: ResponseTemplate) {
        self.mount(
            Mock::given(method("GET"))
                .and(path_regex(r"^/table/v1/driving/"))
                .respond_with(template),
        );
    }

    /// Hold requests whose coordinate list starts with `first_coord` for
    /// `delay`, ahead of any other mounted response.
    pub fn stall_batch_starting_at(&self, first_coord: &str, delay: Duration) {
        let pattern = format!("^/table/v1/driving/{};", regex_escape(first_coord));
        self.mount(
            Mock::given(method("GET"))
                .and(path_regex(pattern))
                .respond_with(ResponseTemplate::new(200).set_delay(delay))
                .with_priority(1),
        );
    }

    pub fn client(&self) -> OsrmClient {
        self.client_with_timeout(5)
    }

    pub fn client_with_timeout(&self, timeout_secs: u64) -> OsrmClient {
        OsrmClient::new(OsrmConfig {
            base_url: self.uri(),
            timeout_secs,
            ..OsrmConfig::default()
        })
        .expect("client construction should not fail")
    }
}

fn regex_escape(coord: &str) -> String {
    coord.replace('.', r"\.")
}

/// A base URL nothing listens on.
pub fn refused_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
