//! Generic persistence operations implemented by the repositories.
//!
//! Each trait is parameterized by the entity it yields and by its key, so a
//! repository with a composite key (a user pair, a ping and invitee) reads the
//! same way as one keyed by a single id.

use sqlx::Error;

/// Inserts a row built from `CreateDTO`; the database assigns the id.
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, Error>;
}

pub trait Read<Entity, Id> {
    /// `Ok(None)` when no row has that key.
    async fn read(&self, id: &Id) -> Result<Option<Entity>, Error>;

    /// Like [`Read::read`], but a missing row is `Error::RowNotFound`.
    async fn require(&self, id: &Id) -> Result<Entity, Error> {
        self.read(id).await?.ok_or(Error::RowNotFound)
    }
}

/// Batch lookup by key. Rows come back in storage order, not in the order of
/// `ids`; unknown keys are skipped.
pub trait ReadMany<Entity, Id> {
    async fn read_many(&self, ids: &[Id]) -> Result<Vec<Entity>, Error>;
}

/// Applies `UpdateDTO` to an existing row and returns it as stored.
/// Fails with `Error::RowNotFound` when the key does not exist.
pub trait Update<Entity, UpdateDTO, Id> {
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, Error>;
}

/// Deleting a missing row is not an error.
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<(), Error>;
}
