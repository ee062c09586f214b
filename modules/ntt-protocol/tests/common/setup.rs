#![allow(dead_code)]

use std::sync::Arc;

use ntt_messages::{
    chain_id::ChainId, ntt::NativeTokenTransfer, ntt_manager::NttManagerMessage,
    transceiver::{TransceiverMessage, TransceiverPrefix},
    transceivers::wormhole::{WormholeTransceiver, WormholeTransceiverPayload},
    trimmed_amount::TrimmedAmount, universal_address::UniversalAddress,
};
use ntt_protocol::{
    clock::ManualClock,
    config::{
        Contracts, Mode, Network, NttConfig, NttContracts, RelayerConfig, TransceiverContracts,
    },
    memory::MemoryNtt,
    ntt::{ChainAddress, Ntt},
    queue::rate_limit::RateLimitState,
    transaction::{Attestation, UnsignedTransaction},
};

// the mint amount is more than the limits, so we can test the rate limits
pub const MINT_AMOUNT: u64 = 100_000;
pub const OUTBOUND_LIMIT: u64 = 10_000;
pub const INBOUND_LIMIT: u64 = 50_000;
pub const DECIMALS: u8 = 8;
pub const RELAYER_BASE_FEE: u64 = 250;

pub const THIS_CHAIN: ChainId = ChainId::SEPOLIA;
pub const OTHER_CHAIN: ChainId = ChainId::ARBITRUM_SEPOLIA;
pub const ANOTHER_CHAIN: ChainId = ChainId::BASE_SEPOLIA;

pub const THIS_MANAGER: UniversalAddress = UniversalAddress::new([1u8; 32]);
pub const THIS_TRANSCEIVER: UniversalAddress = UniversalAddress::new([2u8; 32]);
pub const OTHER_MANAGER: UniversalAddress = UniversalAddress::new([9u8; 32]);
pub const OTHER_TRANSCEIVER: UniversalAddress = UniversalAddress::new([7u8; 32]);

pub const QUOTER: UniversalAddress = UniversalAddress::new([0x0E; 32]);

pub const USER: UniversalAddress = UniversalAddress::new([0xA1; 32]);
pub const RECIPIENT: UniversalAddress = UniversalAddress::new([0xB0; 32]);

pub const START: i64 = 1_700_000_000;

pub struct TestData {
    pub clock: ManualClock,
    /// Deployed on `THIS_CHAIN`; `USER` holds `MINT_AMOUNT`.
    pub ntt: Arc<MemoryNtt>,
    /// Deployed on `OTHER_CHAIN`, peered with `ntt`.
    pub other: Arc<MemoryNtt>,
}

pub fn config(
    chain: ChainId,
    mode: Mode,
    manager: UniversalAddress,
    transceiver: UniversalAddress,
) -> NttConfig {
    NttConfig {
        network: Network::Testnet,
        chain,
        mode,
        token_decimals: DECIMALS,
        outbound_limit: OUTBOUND_LIMIT,
        rate_limit_duration: RateLimitState::DEFAULT_DURATION,
        transceiver_prefixes: vec![TransceiverPrefix::WORMHOLE],
        relayer: Some(RelayerConfig {
            base_fee: RELAYER_BASE_FEE,
            specialized: false,
        }),
        contracts: Contracts {
            ntt: Some(NttContracts {
                manager,
                token: UniversalAddress::new([chain.id as u8; 32]),
                transceiver: TransceiverContracts {
                    wormhole: transceiver,
                },
                quoter: None,
            }),
        },
    }
}

pub async fn setup(mode: Mode) -> TestData {
    setup_with(mode, |config| config).await
}

/// Like [`setup`], with a hook to adjust the configuration of `THIS_CHAIN`.
pub async fn setup_with(mode: Mode, adjust: impl FnOnce(NttConfig) -> NttConfig) -> TestData {
    let clock = ManualClock::new(START);

    let this_config = adjust(config(THIS_CHAIN, mode, THIS_MANAGER, THIS_TRANSCEIVER));
    let other_config = config(OTHER_CHAIN, mode, OTHER_MANAGER, OTHER_TRANSCEIVER);

    let ntt = Arc::new(MemoryNtt::new(&this_config, Arc::new(clock.clone())).unwrap());
    let other = Arc::new(MemoryNtt::new(&other_config, Arc::new(clock.clone())).unwrap());

    ntt.mint_to(USER, MINT_AMOUNT).await.unwrap();
    if mode == Mode::Locking {
        ntt.fund_custody(MINT_AMOUNT).await.unwrap();
        other.fund_custody(MINT_AMOUNT).await.unwrap();
    }

    ntt.set_peer(ChainAddress::new(OTHER_CHAIN, OTHER_MANAGER), DECIMALS, INBOUND_LIMIT)
        .await
        .unwrap();
    ntt.set_wormhole_transceiver_peer(ChainAddress::new(OTHER_CHAIN, OTHER_TRANSCEIVER))
        .await
        .unwrap();
    other
        .set_peer(ChainAddress::new(THIS_CHAIN, THIS_MANAGER), DECIMALS, INBOUND_LIMIT)
        .await
        .unwrap();
    other
        .set_wormhole_transceiver_peer(ChainAddress::new(THIS_CHAIN, THIS_TRANSCEIVER))
        .await
        .unwrap();

    TestData { clock, ntt, other }
}

/// A transfer of `amount` from `OTHER_CHAIN` to `RECIPIENT` on `THIS_CHAIN`.
pub fn inbound_message(id: u8, amount: u64) -> NttManagerMessage<NativeTokenTransfer> {
    NttManagerMessage {
        id: [id; 32],
        sender: USER,
        payload: NativeTokenTransfer {
            trimmed_amount: TrimmedAmount::new(amount, DECIMALS),
            source_token: UniversalAddress::new([OTHER_CHAIN.id as u8; 32]),
            recipient_address: RECIPIENT,
            recipient_chain: THIS_CHAIN,
        },
    }
}

/// `message` as attested by the Wormhole transceiver on `OTHER_CHAIN`.
pub fn inbound_attestation(message: &NttManagerMessage<NativeTokenTransfer>) -> Attestation {
    let transceiver_message = TransceiverMessage::new(
        OTHER_MANAGER,
        THIS_MANAGER,
        message.clone(),
        None::<WormholeTransceiverPayload>,
    );
    Attestation {
        emitter_chain: OTHER_CHAIN,
        emitter_address: OTHER_TRANSCEIVER,
        sequence: 0,
        payload: transceiver_message
            .encode_for::<WormholeTransceiver>()
            .unwrap(),
    }
}

/// The attestation a guardian network would produce for a publish
/// transaction of `THIS_CHAIN`.
pub fn attest_published(tx: &UnsignedTransaction, sequence: u64) -> Attestation {
    assert_eq!(tx.description, "WormholeTransceiver.Publish");
    Attestation {
        emitter_chain: tx.chain,
        emitter_address: THIS_TRANSCEIVER,
        sequence,
        payload: tx.payload.clone(),
    }
}
