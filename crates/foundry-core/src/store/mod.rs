//! Layer persistence.
//!
//! [`ConfigStore`] maps [`LayerId`]s to files under one configuration root
//! and provides plain and guarded (backup + validate) writes.

pub mod codec;
pub mod errors;
pub mod manager;
pub mod paths;

pub use codec::{JsonCodec, LayerCodec, TomlCodec};
pub use errors::StoreError;
pub use manager::{ConfigStore, WriteOptions};
pub use paths::LayerId;
