pub mod flights;
pub mod photos;
pub mod routes;
pub mod tickets;
pub mod users;

pub use flights::Entity as Flights;
pub use photos::Entity as Photos;
pub use routes::Entity as Routes;
pub use tickets::Entity as Tickets;
pub use users::Entity as Users;
