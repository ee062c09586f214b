use common::setup::{
    attest_published, setup, setup_with, TestData, MINT_AMOUNT, OTHER_CHAIN, OTHER_MANAGER,
    OUTBOUND_LIMIT, QUOTER, RECIPIENT, RELAYER_BASE_FEE, THIS_CHAIN, THIS_MANAGER, USER,
};
use ntt_messages::{
    chain_id::ChainId,
    ntt::NativeTokenTransfer,
    ntt_manager::NttManagerMessage,
    transceivers::wormhole::{
        WormholeTransceiver, WormholeTransceiverMessage, WormholeTransceiverPayload,
    },
    trimmed_amount::TrimmedAmount,
    universal_address::UniversalAddress,
};
use ntt_protocol::{
    capability::Capability,
    config::Mode,
    error::NttError,
    ntt::{ChainAddress, Ntt, TransferOptions},
    state::message_id,
};

pub mod common;

fn destination() -> ChainAddress {
    ChainAddress::new(OTHER_CHAIN, RECIPIENT)
}

fn decode_published(payload: &[u8]) -> WormholeTransceiverMessage<NttManagerMessage<NativeTokenTransfer>> {
    WormholeTransceiverMessage::<NttManagerMessage<NativeTokenTransfer>>::decode_for::<
        WormholeTransceiver,
    >(payload)
    .unwrap()
}

#[tokio::test]
async fn test_transfer_locking() {
    let TestData { ntt, other, .. } = setup(Mode::Locking).await;

    let transactions = ntt
        .transfer(USER, 1_000, destination(), TransferOptions::default())
        .await
        .unwrap();

    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].description, "Ntt.Transfer");
    // transceiver index 0, empty relayer hint
    assert_eq!(transactions[0].payload, vec![0x00, 0x00]);
    assert_eq!(transactions[1].chain, THIS_CHAIN);

    let message = decode_published(&transactions[1].payload);
    assert_eq!(message.source_ntt_manager, THIS_MANAGER);
    assert_eq!(message.recipient_ntt_manager, OTHER_MANAGER);
    assert_eq!(message.transceiver_payload, None);
    assert_eq!(
        message.ntt_manager_payload,
        NttManagerMessage {
            id: message_id(0),
            sender: USER,
            payload: NativeTokenTransfer {
                trimmed_amount: TrimmedAmount::new(1_000, 8),
                source_token: UniversalAddress::new([THIS_CHAIN.id as u8; 32]),
                recipient_address: RECIPIENT,
                recipient_chain: OTHER_CHAIN,
            },
        }
    );

    assert_eq!(ntt.balance_of(&USER).await, MINT_AMOUNT - 1_000);
    assert_eq!(ntt.custody_balance().await, MINT_AMOUNT + 1_000);
    assert_eq!(
        ntt.get_current_outbound_capacity().await.unwrap(),
        OUTBOUND_LIMIT - 1_000
    );

    // and it arrives on the other side
    other
        .redeem(&[attest_published(&transactions[1], 0)])
        .await
        .unwrap();
    assert_eq!(other.balance_of(&RECIPIENT).await, 1_000);
    assert_eq!(other.custody_balance().await, MINT_AMOUNT - 1_000);
}

#[tokio::test]
async fn test_transfer_burning() {
    let TestData { ntt, other, .. } = setup(Mode::Burning).await;

    let transactions = ntt
        .transfer(USER, 1_000, destination(), TransferOptions::default())
        .await
        .unwrap();
    assert_eq!(ntt.total_supply().await, MINT_AMOUNT - 1_000);
    assert_eq!(ntt.custody_balance().await, 0);

    other
        .redeem(&[attest_published(&transactions[1], 0)])
        .await
        .unwrap();
    assert_eq!(other.total_supply().await, 1_000);
    assert_eq!(other.balance_of(&RECIPIENT).await, 1_000);
}

#[tokio::test]
async fn test_sequences_increase() {
    let TestData { ntt, .. } = setup(Mode::Locking).await;

    for sequence in 0..3u64 {
        let transactions = ntt
            .transfer(USER, 10, destination(), TransferOptions::default())
            .await
            .unwrap();
        let message = decode_published(&transactions[1].payload);
        assert_eq!(message.ntt_manager_payload.id, message_id(sequence));
    }
}

#[tokio::test]
async fn test_transfer_dust_stays_with_sender() {
    let TestData { ntt, .. } = setup_with(Mode::Locking, |mut config| {
        config.token_decimals = 10;
        config
    })
    .await;

    let transactions = ntt
        .transfer(USER, 9_999, destination(), TransferOptions::default())
        .await
        .unwrap();

    let message = decode_published(&transactions[1].payload);
    assert_eq!(
        message.ntt_manager_payload.payload.trimmed_amount,
        TrimmedAmount::new(99, 8)
    );
    assert_eq!(ntt.balance_of(&USER).await, MINT_AMOUNT - 9_900);
}

#[tokio::test]
async fn test_transfer_with_relayer_hint() {
    let TestData { ntt, .. } = setup(Mode::Locking).await;

    let options = TransferOptions {
        automatic: true,
        ..TransferOptions::default()
    };
    let transactions = ntt
        .transfer(USER, 1_000, destination(), options)
        .await
        .unwrap();

    assert_eq!(transactions[0].payload, vec![0x00, 0x01, 0x00]);
    let message = decode_published(&transactions[1].payload);
    assert_eq!(
        message.transceiver_payload,
        Some(WormholeTransceiverPayload {
            for_specialized_relayer: false
        })
    );
}

#[tokio::test]
async fn test_automatic_transfer_requests_relay_from_quoter() {
    let TestData { ntt, other, .. } = setup_with(Mode::Locking, |mut config| {
        if let Some(contracts) = config.contracts.ntt.as_mut() {
            contracts.quoter = Some(QUOTER);
        }
        config
    })
    .await;

    let options = TransferOptions {
        automatic: true,
        gas_dropoff: 40,
        ..TransferOptions::default()
    };
    let transactions = ntt
        .transfer(USER, 1_000, destination(), options)
        .await
        .unwrap();

    let descriptions: Vec<_> = transactions
        .iter()
        .map(|transaction| transaction.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        ["Ntt.Transfer", "NttQuoter.RequestRelay", "WormholeTransceiver.Publish"]
    );

    let mut expected = QUOTER.to_bytes().to_vec();
    expected.extend_from_slice(&0u64.to_be_bytes());
    expected.extend_from_slice(&40u64.to_be_bytes());
    expected.extend_from_slice(&(RELAYER_BASE_FEE + 40).to_be_bytes());
    assert_eq!(transactions[1].payload, expected);

    // the publish only waits on the transfer
    assert!(!transactions[1].parallelizable);
    assert!(transactions[2].parallelizable);

    other
        .redeem(&[attest_published(&transactions[2], 0)])
        .await
        .unwrap();
    assert_eq!(other.balance_of(&RECIPIENT).await, 1_000);
}

#[tokio::test]
async fn test_manual_transfer_skips_quoter() {
    let TestData { ntt, .. } = setup_with(Mode::Locking, |mut config| {
        if let Some(contracts) = config.contracts.ntt.as_mut() {
            contracts.quoter = Some(QUOTER);
        }
        config
    })
    .await;

    let transactions = ntt
        .transfer(USER, 1_000, destination(), TransferOptions::default())
        .await
        .unwrap();
    assert_eq!(transactions.len(), 2);
    assert!(!transactions[1].parallelizable);
}

#[tokio::test]
async fn test_automatic_transfer_needs_relayer() {
    let TestData { ntt, .. } = setup_with(Mode::Locking, |mut config| {
        config.relayer = None;
        config
    })
    .await;

    let options = TransferOptions {
        automatic: true,
        ..TransferOptions::default()
    };
    let err = ntt
        .transfer(USER, 1_000, destination(), options)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NttError::CapabilityUnsupported(Capability::AutomaticRelay)
    ));
    assert_eq!(ntt.balance_of(&USER).await, MINT_AMOUNT);
}

#[tokio::test]
async fn test_transfer_exceeding_limit_fails() {
    let TestData { ntt, .. } = setup(Mode::Locking).await;

    let err = ntt
        .transfer(
            USER,
            OUTBOUND_LIMIT + 1,
            destination(),
            TransferOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NttError::TransferExceedsRateLimit {
            amount,
            capacity: OUTBOUND_LIMIT,
        } if amount == OUTBOUND_LIMIT + 1
    ));
    assert_eq!(ntt.balance_of(&USER).await, MINT_AMOUNT);
}

#[tokio::test]
async fn test_cant_transfer_to_unknown_peer() {
    let TestData { ntt, .. } = setup(Mode::Locking).await;

    let err = ntt
        .transfer(
            USER,
            1_000,
            ChainAddress::new(ChainId::BASE_SEPOLIA, RECIPIENT),
            TransferOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, NttError::UnknownPeer(ChainId::BASE_SEPOLIA)));
}

#[tokio::test]
async fn test_cant_transfer_more_than_balance() {
    let TestData { ntt, .. } = setup(Mode::Locking).await;

    let err = ntt
        .transfer(
            USER,
            MINT_AMOUNT + 1,
            destination(),
            TransferOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NttError::InsufficientFunds {
            available: MINT_AMOUNT,
            ..
        }
    ));
}

#[tokio::test]
async fn test_cant_transfer_zero() {
    let TestData { ntt, .. } = setup(Mode::Locking).await;

    let err = ntt
        .transfer(USER, 0, destination(), TransferOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, NttError::ZeroAmount));
}

#[tokio::test]
async fn test_cant_transfer_when_paused() {
    let TestData { ntt, .. } = setup(Mode::Locking).await;

    ntt.set_paused(true).await;
    let err = ntt
        .transfer(USER, 1_000, destination(), TransferOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, NttError::Paused));

    ntt.set_paused(false).await;
    ntt.transfer(USER, 1_000, destination(), TransferOptions::default())
        .await
        .unwrap();
}
