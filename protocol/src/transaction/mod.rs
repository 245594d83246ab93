//! # Transaction Module
//!
//! Wire codecs for Stacks transactions and the entities nested inside them.
//!
//! ```text
//! authorization.rs  — Spending conditions and standard/sponsored auth
//! post_condition.rs — STX, fungible and non-fungible post-conditions
//! clarity.rs        — Serialized Clarity values (contract-call arguments)
//! payload.rs        — Payload variants and discriminant dispatch
//! builder.rs        — StacksTransaction and its fluent builder
//! ```
//!
//! Payload discriminants `0x00..=0x03` select their dedicated bodies; every
//! other byte decodes a coinbase body. The byte actually read is kept on the
//! transaction so the encoding is reproduced exactly.

pub mod authorization;
pub mod builder;
pub mod clarity;
pub mod payload;
pub mod post_condition;

pub use authorization::{
    KeyEncoding, MultiSigHashMode, MultiSigSpendingCondition, SingleSigHashMode,
    SingleSigSpendingCondition, SpendingCondition, TransactionAuth, TransactionAuthField,
};
pub use builder::{StacksTransaction, TransactionBuilder, TransactionVec};
pub use clarity::ClarityValue;
pub use payload::{
    ContractCallPayload, PoisonMicroblockPayload, SmartContractPayload, StacksMicroblockHeader,
    TokenTransferPayload, TransactionPayload,
};
pub use post_condition::{
    AssetInfo, PostConditionPrincipal, PostConditionVec, TransactionPostCondition,
};
