use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("Flickr mock listening on http://{addr}/services/rest/ (api_key={})", mock_server::API_KEY);
    mock_server::run(listener).await
}
