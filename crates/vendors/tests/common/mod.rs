//! Fake vendor servers for adapter tests.

use axum::Router;
use studio_vendors::{VendorClients, VendorEndpoints};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_vendor(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Vendor clients all pointed at one fake server.
pub async fn clients_for(router: Router) -> VendorClients {
    let base = spawn_vendor(router).await;
    VendorClients::new(&VendorEndpoints::uniform(&base))
}
