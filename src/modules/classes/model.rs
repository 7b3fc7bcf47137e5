pub use schoolhub_models::classes::{Class, CreateClassDto, UpdateClassDto};
