use reqwest::blocking::{Request, Response};

/// Executes HTTP requests for schedule downloads.
pub trait HttpClient {
    fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
