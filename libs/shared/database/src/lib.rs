pub mod error;
pub mod gateway;
pub mod memory;
pub mod mongo;
pub mod repository;

use std::sync::Arc;

use shared_models::goal::Goal;
use shared_models::meal_prep::MealPrep;
use shared_models::workout::Workout;

pub use error::DatabaseError;
pub use gateway::MongoGateway;
pub use repository::{DocumentRepository, ListFilter, OwnedDocument, UserRepository};

/// Every repository a request handler can reach.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub goals: Arc<dyn DocumentRepository<Goal>>,
    pub workouts: Arc<dyn DocumentRepository<Workout>>,
    pub meal_preps: Arc<dyn DocumentRepository<MealPrep>>,
}

impl Repositories {
    pub fn mongo(gateway: Arc<MongoGateway>) -> Self {
        Self {
            users: Arc::new(mongo::MongoUserRepository::new(gateway.clone())),
            goals: Arc::new(mongo::MongoRepository::<Goal>::new(gateway.clone())),
            workouts: Arc::new(mongo::MongoRepository::<Workout>::new(gateway.clone())),
            meal_preps: Arc::new(mongo::MongoRepository::<MealPrep>::new(gateway)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserRepository::default()),
            goals: Arc::new(memory::MemoryRepository::<Goal>::default()),
            workouts: Arc::new(memory::MemoryRepository::<Workout>::default()),
            meal_preps: Arc::new(memory::MemoryRepository::<MealPrep>::default()),
        }
    }
}
