/// Monotonic clocks read by the timing probe
pub mod clock;

/// Constants used throughout the VM implementation
pub mod constants;

/// Registry of host callbacks reachable through `call_external`
pub mod external;

/// Integrity latch, timing probe and the checksum fold
pub mod integrity;

/// Opcode definitions and metadata
pub mod opcodes;

/// Self-modifying program store
pub mod program;

/// Operand stack implementation for the VM
pub mod stack;

/// Common types for the VM
pub mod types;

/// Core virtual machine implementation
pub mod vm;
