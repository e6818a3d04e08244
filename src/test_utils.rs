//! Helpers shared by the unit tests.

#![allow(missing_docs)]

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use email_address::EmailAddress;
use rusqlite::Connection;

use crate::{
    Error, PasswordHash, SQLAppState, User, UserID, UserStore, ValidatedPassword,
    category::{Category, CategoryId, CategoryPatch, CategoryState, CategoryStore, NewCategory},
    create_app_state,
};

/// A password that passes the strength check.
pub(crate) const TEST_PASSWORD: &str = "turkeysgogobblegobble";

/// The lowest cost bcrypt accepts, so that tests do not spend their time hashing.
const TEST_HASH_COST: u32 = 4;

/// An app state backed by an in-memory SQLite database.
pub(crate) fn get_test_app_state() -> SQLAppState {
    let connection = Connection::open_in_memory().unwrap();
    let mut state = create_app_state(connection, "foobar").unwrap();
    state.password_hash_cost = TEST_HASH_COST;

    state
}

/// Add a user with [TEST_PASSWORD] to the SQLite store.
pub(crate) fn create_test_user(state: &SQLAppState, email: &str) -> User {
    create_user_in(&state.user_store, email)
}

fn create_user_in(store: &impl UserStore, email: &str) -> User {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        TEST_HASH_COST,
    )
    .unwrap();

    store
        .create(EmailAddress::new_unchecked(email), password_hash)
        .unwrap()
}

/// A category store that keeps everything in a map.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeCategoryStore {
    categories: Arc<Mutex<BTreeMap<CategoryId, Category>>>,
}

impl CategoryStore for FakeCategoryStore {
    fn create(&self, new_category: NewCategory) -> Result<Category, Error> {
        let mut categories = self.categories.lock().unwrap();
        let id = categories.keys().next_back().map_or(1, |id| id + 1);
        let category = Category {
            id,
            name: new_category.name,
            icon: new_category.icon,
            color: new_category.color,
            amount: 0.0,
            owner: new_category.owner,
        };
        categories.insert(id, category.clone());

        Ok(category)
    }

    fn get(&self, id: CategoryId) -> Result<Category, Error> {
        self.categories
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_by_owner(&self, owner: UserID) -> Result<Vec<Category>, Error> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .values()
            .filter(|category| category.owner == owner)
            .cloned()
            .collect())
    }

    fn update(&self, id: CategoryId, patch: &CategoryPatch) -> Result<Category, Error> {
        let mut categories = self.categories.lock().unwrap();
        let stored = categories.get_mut(&id).ok_or(Error::NotFound)?;
        stored.apply(patch.clone());

        Ok(stored.clone())
    }

    fn add_to_amount(&self, id: CategoryId, delta: f64) -> Result<Category, Error> {
        let mut categories = self.categories.lock().unwrap();
        let stored = categories.get_mut(&id).ok_or(Error::NotFound)?;
        stored.amount += delta;

        Ok(stored.clone())
    }

    fn delete(&self, id: CategoryId) -> Result<(), Error> {
        self.categories
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound)
    }
}

/// A user store that keeps everything in a list.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeUserStore {
    users: Arc<Mutex<Vec<User>>>,
}

impl UserStore for FakeUserStore {
    fn create(&self, email: EmailAddress, password_hash: PasswordHash) -> Result<User, Error> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|user| user.email == email) {
            return Err(Error::DuplicateEmail);
        }

        let user = User {
            id: UserID::new(users.len() as i64 + 1),
            email,
            password_hash,
        };
        users.push(user.clone());

        Ok(user)
    }

    fn get(&self, id: UserID) -> Result<User, Error> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| &user.email == email)
            .cloned()
            .ok_or(Error::NotFound)
    }
}

/// Category handler state backed by the fake stores, plus a registered user.
pub(crate) fn get_fake_category_state() -> (CategoryState<FakeCategoryStore, FakeUserStore>, User)
{
    let state = CategoryState {
        category_store: FakeCategoryStore::default(),
        user_store: FakeUserStore::default(),
    };
    let user = create_fake_user(&state.user_store, "foo@bar.baz");

    (state, user)
}

/// Add a user with [TEST_PASSWORD] to the fake store.
pub(crate) fn create_fake_user(store: &FakeUserStore, email: &str) -> User {
    create_user_in(store, email)
}
