//! A typed, in-memory copy of one collection document.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use super::{DocumentBackend, RepositoryError};

/// One collection held in memory and written through to its backend.
#[derive(Debug)]
pub struct Collection<T> {
    name: &'static str,
    backend: Arc<dyn DocumentBackend>,
    data: Mutex<T>,
    verified: bool,
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send,
{
    /// Load `name` from `backend`.
    ///
    /// Never fails: a missing, corrupt or unreadable document yields an
    /// empty collection. Writes stay blocked when the document could not be
    /// read, or when it was corrupt and could not be copied aside.
    pub fn open(name: &'static str, backend: Arc<dyn DocumentBackend>) -> Self {
        let (data, verified) = match backend.read(name) {
            Ok(None) => (T::default(), true),
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(data) => (data, true),
                Err(e) => match backend.quarantine(name) {
                    Ok(target) => {
                        tracing::warn!(
                            collection = name,
                            error = %e,
                            copied_to = %target,
                            "Collection is corrupt, starting empty"
                        );
                        (T::default(), true)
                    }
                    Err(copy_err) => {
                        tracing::error!(
                            collection = name,
                            error = %e,
                            copy_error = %copy_err,
                            "Collection is corrupt and could not be copied aside; serving empty data and refusing writes"
                        );
                        (T::default(), false)
                    }
                },
            },
            Err(e) => {
                tracing::error!(
                    collection = name,
                    error = %e,
                    "Collection is unreadable; serving empty data and refusing writes"
                );
                (T::default(), false)
            }
        };

        Self {
            name,
            backend,
            data: Mutex::new(data),
            verified,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the document was read successfully at startup.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.verified
    }

    /// Run `f` against the current data.
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let data = self.data.lock().await;
        f(&data)
    }

    /// Clone of the current data.
    pub async fn snapshot(&self) -> T {
        self.data.lock().await.clone()
    }

    /// Mutate a copy of the data with `f`, write it, then commit it.
    ///
    /// If `f` fails nothing is written; if the write fails the in-memory
    /// data is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `f`'s error, or a `RepositoryError` converted into `E` when the
    /// collection is unverified or the write fails.
    pub async fn update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<RepositoryError>,
    {
        let mut data = self.data.lock().await;
        if !self.verified {
            return Err(RepositoryError::Unverified(self.name).into());
        }

        let mut draft = data.clone();
        let result = f(&mut draft)?;

        let bytes =
            serde_json::to_vec_pretty(&draft).map_err(|source| RepositoryError::Serialization {
                collection: self.name,
                source,
            })?;
        self.backend
            .write(self.name, &bytes)
            .map_err(|source| RepositoryError::Io {
                collection: self.name,
                source,
            })?;

        *data = draft;
        Ok(result)
    }
}
