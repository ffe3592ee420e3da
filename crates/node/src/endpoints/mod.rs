//! # ノードエンドポイント

pub mod events;
pub mod info;
pub mod metadata;
pub mod redeem;
pub mod signers;
pub mod treasury;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use events::handle_events;
pub use info::handle_collection_info;
pub use metadata::{handle_reveal, handle_seal, handle_sealed, handle_token_uri};
pub use redeem::{handle_redeem_content, handle_redeem_token};
pub use signers::{handle_add_signer, handle_renounce_signer, handle_signer_status};
pub use treasury::handle_withdraw;
