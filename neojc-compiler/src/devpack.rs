//! Internal names of library classes the compiler treats specially.

pub const OBJECT: &str = neojc_class::OBJECT;
pub const STRING: &str = "java/lang/String";
pub const STRING_BUILDER: &str = "java/lang/StringBuilder";
pub const THROWABLE: &str = "java/lang/Throwable";
pub const EXCEPTION: &str = "java/lang/Exception";

/// Boxed primitive types whose conversions compile to nothing.
pub const BOXED: &[&str] = &[
    "java/lang/Integer",
    "java/lang/Long",
    "java/lang/Byte",
    "java/lang/Short",
    "java/lang/Boolean",
    "java/lang/Character",
];

/// JDK exception types recognized without being in the class path.
pub const JDK_THROWABLES: &[&str] = &[
    THROWABLE,
    EXCEPTION,
    "java/lang/Error",
    "java/lang/RuntimeException",
    "java/lang/IllegalArgumentException",
    "java/lang/IllegalStateException",
    "java/lang/ArithmeticException",
    "java/lang/NullPointerException",
    "java/lang/IndexOutOfBoundsException",
    "java/lang/ArrayIndexOutOfBoundsException",
    "java/lang/UnsupportedOperationException",
];

/// Implemented by every event type; a static field of such a type is an event.
pub const EVENT_INTERFACE: &str = "io/neow3j/devpack/events/EventInterface";
/// Package of the library's event types, `Event1Arg` up to `Event16Args`.
pub const EVENTS_PACKAGE: &str = "io/neow3j/devpack/events/";
/// Interop service that emits an event.
pub const RUNTIME_NOTIFY: &str = "System.Runtime.Notify";

pub const STRING_LITERAL_HELPER: &str = "io/neow3j/devpack/StringLiteralHelper";
pub const CONTRACT_INTERFACE: &str = "io/neow3j/devpack/contracts/ContractInterface";

pub const HASH160: &str = "io/neow3j/devpack/Hash160";
pub const HASH256: &str = "io/neow3j/devpack/Hash256";
pub const EC_POINT: &str = "io/neow3j/devpack/ECPoint";
pub const BYTE_STRING: &str = "io/neow3j/devpack/ByteString";
pub const MAP: &str = "io/neow3j/devpack/Map";
pub const LIST: &str = "io/neow3j/devpack/List";
pub const INTEROP_INTERFACE: &str = "io/neow3j/devpack/InteropInterface";

/// Contract interface method returning the script hash of the contract.
pub const GET_HASH: &str = "getHash";

/// Address version byte of N3 addresses.
pub const ADDRESS_VERSION: u8 = 0x35;

pub fn is_boxed(owner: &str) -> bool {
    BOXED.contains(&owner)
}
