//! # HTTP Handlers
//!
//! One module per resource group, mirroring the route table:
//!
//! - [`auth`] - register / login
//! - [`books`] - public catalog reads
//! - [`cart`] - buyer cart operations
//! - [`orders`] - checkout and order history
//! - [`admin`] - admin-gated book/user/order management

use serde::{Deserialize, Serialize};

use kitab_core::{Role, User};

pub mod admin;
pub mod auth;
pub mod books;
pub mod cart;
pub mod orders;

/// The subset of a user exposed in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}
