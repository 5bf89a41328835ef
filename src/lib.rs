pub mod error;

pub mod service {
    pub mod codec;
    pub mod config_service;
    pub mod discovery;

    pub mod traits {
        pub mod i_service;
    }
}

pub mod config {
    pub mod config;
    pub mod ports;
}

pub mod action {
    pub mod cli;
    pub mod interactive;
}

pub mod facade {
    pub mod conversion_facade;

    pub mod ports {
        pub mod facade_ports;
    }

    pub mod traits {
        pub mod i_conversion;
    }
}

pub mod models {
    pub mod conversion;
    pub mod file;
    pub mod decoded;
}

pub mod utils {
    pub mod path;
    pub mod utils;
}

pub use error::{ConversionError, DiscoveryError, Error, Result, SpecError};
pub use facade::conversion_facade::ConversionFacade;
pub use models::conversion::{
    ConversionOutcome, ConversionSpec, ConversionStage, ConversionSummary, MatchPolicy, RunStatus,
};
pub use models::file::{FileDiscoveryInput, FileList};
pub use utils::path::derive_path;
