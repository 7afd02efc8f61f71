//! Opcode byte constants.
//!
//! Only the subset the SDK emits when composing locking scripts and
//! embedded-data outputs is defined here; the chain defines many more.

/// Push an empty array onto the stack.
pub const OP_0: u8 = 0x00;
/// Alias for [`OP_0`].
pub const OP_FALSE: u8 = 0x00;
/// Push the next 20 bytes onto the stack.
pub const OP_DATA_20: u8 = 0x14;
/// The next byte contains the number of bytes to push.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// The next 2 bytes (LE) contain the number of bytes to push.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// The next 4 bytes (LE) contain the number of bytes to push.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Marks the output as unspendable; the remainder carries data.
pub const OP_RETURN: u8 = 0x6a;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Pop two items, push whether they are equal.
pub const OP_EQUAL: u8 = 0x87;
/// Like OP_EQUAL, but fail the script unless equal.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// Hash the top stack item with SHA-256 then RIPEMD-160.
pub const OP_HASH160: u8 = 0xa9;
/// Verify a signature against a public key.
pub const OP_CHECKSIG: u8 = 0xac;
