use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Client, Database, IndexModel,
};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::error::DatabaseError;

pub const USERS_COLLECTION: &str = "users";

/// Process-wide MongoDB handle.
///
/// The first `get_connection` connects, pings and ensures the unique email index. Callers
/// racing on that first call wait for the same attempt. A failed attempt leaves the cell
/// empty, so the next call tries again.
pub struct MongoGateway {
    uri: String,
    database_name: String,
    database: OnceCell<Database>,
}

impl MongoGateway {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            uri: config.database_url.clone(),
            database_name: config.database_name.clone(),
            database: OnceCell::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.database.initialized()
    }

    pub async fn get_connection(&self) -> Result<Database, DatabaseError> {
        self.database
            .get_or_try_init(|| self.connect())
            .await
            .cloned()
    }

    async fn connect(&self) -> Result<Database, DatabaseError> {
        debug!("Connecting to MongoDB database {}", self.database_name);

        let client = Client::with_uri_str(&self.uri)
            .await
            .map_err(connection_error)?;
        let database = client.database(&self.database_name);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_error)?;

        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        database
            .collection::<Document>(USERS_COLLECTION)
            .create_index(email_index)
            .await
            .map_err(connection_error)?;

        info!("Connected to MongoDB database {}", self.database_name);
        Ok(database)
    }
}

fn connection_error(err: mongodb::error::Error) -> DatabaseError {
    error!("Error connecting to MongoDB: {}", err);
    DatabaseError::Connection(err.to_string())
}
