//! # Customer Directory
//!
//! Walk-in customers registered at the desk. Sessions reference customers by
//! id only; a session cannot start for an id that is not registered here.

use arcade_core::error::{CoreError, CoreResult};
use arcade_core::validation::{validate_id, validate_name, validate_phone};
use arcade_core::{Customer, NewCustomer};

#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    customers: Vec<Customer>,
}

impl CustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a customer. Name and phone are required; `next_id` is only
    /// called once both pass.
    pub fn create(
        &mut self,
        input: NewCustomer,
        next_id: impl FnOnce() -> String,
    ) -> CoreResult<&Customer> {
        validate_name("name", &input.name)?;
        validate_phone(&input.phone)?;
        let id = next_id();
        validate_id("customer", &id)?;

        self.customers.push(Customer {
            id,
            name: input.name.trim().to_string(),
            phone: input.phone.trim().to_string(),
            address: input.address.trim().to_string(),
            ktp_photo_url: input.ktp_photo_url.filter(|url| !url.trim().is_empty()),
            membership: input.membership,
        });
        let index = self.customers.len() - 1;
        Ok(&self.customers[index])
    }

    pub fn get(&self, id: &str) -> CoreResult<&Customer> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))
    }

    /// In registration order.
    pub fn list(&self) -> &[Customer] {
        &self.customers
    }
}
