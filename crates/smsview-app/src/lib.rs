// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod contacts;
pub mod identity;
pub mod ids;
pub mod model;
pub mod normalize;
pub mod state;
pub mod thread;
pub mod timestamp;

pub use contacts::*;
pub use identity::*;
pub use ids::*;
pub use model::*;
pub use normalize::*;
pub use state::*;
pub use thread::*;
