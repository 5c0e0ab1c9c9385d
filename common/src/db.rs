use mongodb::{Client, Database, options::ClientOptions};

pub async fn init_db(url: &str, db_name: &str) -> mongodb::error::Result<Database> {
    let mut options = ClientOptions::parse(url).await?;
    options.app_name = Some("edu_cloud".to_string());
    let client = Client::with_options(options)?;
    Ok(client.database(db_name))
}
