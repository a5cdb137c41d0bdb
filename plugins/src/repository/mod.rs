pub mod file;
pub mod memory;

pub use file::FileSecurityRepository;
pub use memory::InMemorySecurityRepository;
