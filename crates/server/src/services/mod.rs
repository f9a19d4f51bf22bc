pub mod vm_service;

pub use vm_service::VmService;
