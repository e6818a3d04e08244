//! Defines the category store trait.

use crate::{
    Error, UserID,
    category::{Category, CategoryId, CategoryPatch, NewCategory},
};

/// Creates, retrieves, updates and deletes spending categories.
///
/// Lookup methods return [Error::NotFound] when there is no category with the
/// given ID.
pub trait CategoryStore {
    /// Create a new category with an amount of zero and add it to the store.
    fn create(&self, new_category: NewCategory) -> Result<Category, Error>;

    /// Get a category by its ID.
    fn get(&self, id: CategoryId) -> Result<Category, Error>;

    /// Get all categories owned by `owner`, ordered by ID.
    fn get_by_owner(&self, owner: UserID) -> Result<Vec<Category>, Error>;

    /// Write the fields present in `patch` to the category with `id` and
    /// return the updated category.
    ///
    /// Fields missing from `patch` keep their stored values, so this must not
    /// undo a concurrent [CategoryStore::add_to_amount].
    fn update(&self, id: CategoryId, patch: &CategoryPatch) -> Result<Category, Error>;

    /// Atomically add `delta` to the amount of a category and return the
    /// updated category.
    ///
    /// Concurrent calls must not lose updates.
    fn add_to_amount(&self, id: CategoryId, delta: f64) -> Result<Category, Error>;

    /// Remove a category from the store.
    fn delete(&self, id: CategoryId) -> Result<(), Error>;
}
