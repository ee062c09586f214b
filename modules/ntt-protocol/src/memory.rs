//! A complete in-process [`Ntt`] adapter.
//!
//! `MemoryNtt` keeps everything a deployed manager would keep on chain
//! (balances, custody, peers, limiters, inbox and outbox) in one
//! [`NttState`] behind a mutex. Every operation holds the lock from its first
//! check to its last write, so operations on one adapter never interleave.
//! The returned transactions describe what was applied; there is nothing
//! left to submit.

use std::sync::Arc;

use async_trait::async_trait;
use ntt_messages::{
    chain_id::ChainId,
    layout::Payload,
    ntt::NativeTokenTransfer,
    ntt_manager::NttManagerMessage,
    transceiver::{TransceiverInstruction, TransceiverMessage},
    transceivers::wormhole::{WormholeTransceiver, WormholeTransceiverPayload},
    universal_address::UniversalAddress,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    capability::{Capability, CapabilitySet},
    clock::Clock,
    config::{NttConfig, RelayerConfig},
    error::{NttError, Result},
    instructions::{self, OutboundMessage, RedeemOutcome, TransferArgs},
    ntt::{ChainAddress, InboundQueuedTransfer, Ntt, OutboundQueuedTransfer, TransferOptions},
    peer::PeerConfig,
    queue::inbox::{InboxItem, InboxKey, ReleaseStatus},
    queue::outbox::OutboxItem,
    state::{ManagerConfig, NttState},
    transaction::{Attestation, UnsignedTransaction},
};

pub struct MemoryNtt {
    chain: ChainId,
    manager: UniversalAddress,
    token_decimals: u8,
    capabilities: CapabilitySet,
    relayer: Option<RelayerConfig>,
    quoter: Option<UniversalAddress>,
    clock: Arc<dyn Clock>,
    state: Mutex<NttState>,
}

impl MemoryNtt {
    /// Builds an adapter for the deployment in `config`.
    ///
    /// Relaying and delivery quotes are offered only when `config.relayer`
    /// is set. NFT transfers are never offered. With a quoter contract
    /// configured, automatic transfers also request their relay from it.
    pub fn new(config: &NttConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let contracts = config.ntt_contracts()?;

        let mut capabilities = CapabilitySet::all() - CapabilitySet::NFT_TRANSFER;
        if config.relayer.is_none() {
            capabilities -= CapabilitySet::AUTOMATIC_RELAY | CapabilitySet::DELIVERY_QUOTE;
        }

        let manager_config = ManagerConfig {
            chain: config.chain,
            mode: config.mode,
            token_decimals: config.token_decimals,
            manager: contracts.manager,
            token: contracts.token,
            transceiver: contracts.transceiver.wormhole,
            rate_limit_duration: config.rate_limit_duration,
            transceiver_prefixes: config.transceiver_prefixes.clone(),
            paused: false,
        };
        let state = NttState::new(manager_config, config.outbound_limit, clock.now());

        debug!(
            chain = %config.chain,
            network = %config.network,
            manager = %contracts.manager,
            "memory adapter created"
        );

        Ok(Self {
            chain: config.chain,
            manager: contracts.manager,
            token_decimals: config.token_decimals,
            capabilities,
            relayer: config.relayer.clone(),
            quoter: contracts.quoter,
            clock,
            state: Mutex::new(state),
        })
    }

    /// Narrows the advertised capabilities to those also in `capabilities`.
    pub fn with_capabilities(mut self, capabilities: CapabilitySet) -> Self {
        self.capabilities &= capabilities;
        self
    }

    pub fn manager_address(&self) -> UniversalAddress {
        self.manager
    }

    pub async fn transceiver_address(&self) -> UniversalAddress {
        self.state.lock().await.config.transceiver
    }

    pub async fn mint_to(&self, account: UniversalAddress, amount: u64) -> Result<()> {
        self.state.lock().await.ledger.mint(account, amount)
    }

    pub async fn fund_custody(&self, amount: u64) -> Result<()> {
        self.state.lock().await.ledger.fund_custody(amount)
    }

    pub async fn balance_of(&self, account: &UniversalAddress) -> u64 {
        self.state.lock().await.ledger.balance_of(account)
    }

    pub async fn custody_balance(&self) -> u64 {
        self.state.lock().await.ledger.custody()
    }

    pub async fn total_supply(&self) -> u64 {
        self.state.lock().await.ledger.total_supply()
    }

    pub async fn set_paused(&self, paused: bool) {
        instructions::set_paused(&mut *self.state.lock().await, paused);
        info!(chain = %self.chain, paused, "pause flag set");
    }

    pub async fn set_outbound_limit(&self, limit: u64) {
        let now = self.clock.now();
        instructions::set_outbound_limit(&mut *self.state.lock().await, limit, now);
        info!(chain = %self.chain, limit, "outbound limit set");
    }

    pub async fn set_inbound_limit(&self, from_chain: ChainId, limit: u64) -> Result<()> {
        let now = self.clock.now();
        instructions::set_inbound_limit(&mut *self.state.lock().await, from_chain, limit, now)?;
        info!(chain = %self.chain, from_chain = %from_chain, limit, "inbound limit set");
        Ok(())
    }

    pub async fn peer(&self, chain: ChainId) -> Option<PeerConfig> {
        self.state.lock().await.peer_config(chain)
    }

    fn delivery_price(&self, gas_dropoff: u64) -> Result<u64> {
        let relayer = self
            .relayer
            .as_ref()
            .ok_or(NttError::CapabilityUnsupported(Capability::DeliveryQuote))?;
        relayer
            .base_fee
            .checked_add(gas_dropoff)
            .ok_or(NttError::Overflow)
    }

    /// Asks the quoter to relay outbox item `sequence`, paying at most
    /// `max_fee`.
    fn request_relay(
        &self,
        quoter: UniversalAddress,
        sequence: u64,
        gas_dropoff: u64,
        max_fee: u64,
    ) -> UnsignedTransaction {
        let mut payload = Vec::with_capacity(32 + 3 * 8);
        payload.extend_from_slice(quoter.as_bytes());
        payload.extend_from_slice(&sequence.to_be_bytes());
        payload.extend_from_slice(&gas_dropoff.to_be_bytes());
        payload.extend_from_slice(&max_fee.to_be_bytes());
        UnsignedTransaction::new(self.chain, "NttQuoter.RequestRelay", payload)
    }

    fn publish(&self, message: &OutboundMessage) -> Result<UnsignedTransaction> {
        Ok(UnsignedTransaction::new(
            self.chain,
            "WormholeTransceiver.Publish",
            message.encode_for::<WormholeTransceiver>()?,
        ))
    }

    /// The inbox key an attestation would occupy, without validating it.
    fn inbox_key(state: &NttState, attestation: &Attestation) -> Result<InboxKey> {
        let (_, message) = TransceiverMessage::<Vec<u8>, Vec<u8>>::decode(
            &attestation.payload,
            &state.config.transceiver_prefixes,
        )?;
        let message = message.parse_manager_payload::<NttManagerMessage<Vec<u8>>>()?;
        Ok((attestation.emitter_chain, message.ntt_manager_payload.id))
    }
}

#[async_trait]
impl Ntt for MemoryNtt {
    fn chain(&self) -> ChainId {
        self.chain
    }

    fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    async fn transfer(
        &self,
        sender: UniversalAddress,
        amount: u64,
        destination: ChainAddress,
        options: TransferOptions,
    ) -> Result<Vec<UnsignedTransaction>> {
        let relayer_hint = if options.automatic {
            self.capabilities.require(Capability::AutomaticRelay)?;
            self.relayer
                .as_ref()
                .map(|relayer| WormholeTransceiverPayload {
                    for_specialized_relayer: relayer.specialized,
                })
        } else {
            None
        };
        let relay_request = match self.quoter {
            Some(quoter) if options.automatic => {
                Some((quoter, self.delivery_price(options.gas_dropoff)?))
            }
            _ => None,
        };

        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let item = instructions::transfer(
            &mut state,
            TransferArgs {
                sender,
                amount,
                recipient: destination,
                should_queue: options.queue,
                relayer_hint,
            },
            now,
        )?;

        let instruction = TransceiverInstruction {
            index: 0,
            payload: item.relayer_hint,
        };
        let mut transactions = vec![UnsignedTransaction::new(
            self.chain,
            "Ntt.Transfer",
            instruction.to_payload_bytes()?,
        )];
        if let Some((quoter, max_fee)) = relay_request {
            transactions.push(self.request_relay(
                quoter,
                item.sequence,
                options.gas_dropoff,
                max_fee,
            ));
        }

        if item.release_timestamp > now {
            info!(
                chain = %self.chain,
                sequence = item.sequence,
                release_after = item.release_timestamp,
                "outbound transfer queued"
            );
            return Ok(transactions);
        }

        let message = instructions::release_outbound(&mut state, item.sequence, now)?;
        let publish = self.publish(&message)?;
        // the relay request and the publish both only wait on the transfer
        transactions.push(if relay_request.is_some() {
            publish.parallelizable()
        } else {
            publish
        });
        info!(
            chain = %self.chain,
            sequence = item.sequence,
            to_chain = %destination.chain,
            amount = item.amount.amount(),
            "outbound transfer sent"
        );

        Ok(transactions)
    }

    async fn redeem(&self, attestations: &[Attestation]) -> Result<Vec<UnsignedTransaction>> {
        if attestations.is_empty() {
            return Err(NttError::NoAttestations);
        }

        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let outcomes = match instructions::redeem_batch(&mut state, attestations, now) {
            Ok(outcomes) => outcomes,
            Err(err) => {
                match &err {
                    NttError::AlreadyRedeemed { chain, id } => warn!(
                        chain = %chain,
                        id = %hex::encode(id),
                        "replayed message rejected"
                    ),
                    NttError::PeerMismatch {
                        chain,
                        expected,
                        found,
                    } => warn!(
                        chain = %chain,
                        %expected,
                        %found,
                        "attestation from unexpected peer rejected"
                    ),
                    other => debug!(chain = %self.chain, error = %other, "redeem rejected"),
                }
                return Err(err);
            }
        };

        let mut transactions = Vec::with_capacity(attestations.len());
        for (attestation, outcome) in attestations.iter().zip(outcomes) {
            match outcome {
                RedeemOutcome::Released(released) => info!(
                    chain = %self.chain,
                    from_chain = %released.from_chain,
                    id = %hex::encode(released.id),
                    amount = released.amount,
                    "inbound transfer released"
                ),
                RedeemOutcome::Queued(queued) => info!(
                    chain = %self.chain,
                    from_chain = %attestation.emitter_chain,
                    id = %hex::encode(queued.message.id),
                    release_after = queued.release_after,
                    "inbound transfer queued"
                ),
            }

            // each attestation is redeemed on its own
            transactions.push(
                UnsignedTransaction::new(self.chain, "Ntt.Redeem", attestation.payload.clone())
                    .parallelizable(),
            );
        }

        Ok(transactions)
    }

    async fn set_peer(
        &self,
        peer: ChainAddress,
        token_decimals: u8,
        inbound_limit: u64,
    ) -> Result<Vec<UnsignedTransaction>> {
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let config = instructions::set_peer(&mut state, peer, token_decimals, inbound_limit, now)?;
        info!(
            chain = %self.chain,
            peer_chain = %peer.chain,
            manager = %peer.address,
            token_decimals,
            inbound_limit,
            "peer set"
        );

        Ok(vec![UnsignedTransaction::new(
            self.chain,
            "Ntt.SetPeer",
            config.to_bytes()?,
        )])
    }

    async fn set_wormhole_transceiver_peer(
        &self,
        peer: ChainAddress,
    ) -> Result<Vec<UnsignedTransaction>> {
        let mut state = self.state.lock().await;

        let registration = instructions::set_transceiver_peer(&mut state, peer)?;
        info!(
            chain = %self.chain,
            peer_chain = %peer.chain,
            transceiver = %peer.address,
            "transceiver peer set"
        );

        Ok(vec![UnsignedTransaction::new(
            self.chain,
            "WormholeTransceiver.SetPeer",
            registration.to_payload_bytes()?,
        )])
    }

    async fn is_relaying_available(&self, destination: ChainId) -> Result<bool> {
        if !self.capabilities.supports(Capability::AutomaticRelay) {
            return Ok(false);
        }
        Ok(self.state.lock().await.peers.contains_key(&destination))
    }

    async fn quote_delivery_price(
        &self,
        destination: ChainId,
        options: &TransferOptions,
    ) -> Result<u64> {
        self.capabilities.require(Capability::DeliveryQuote)?;
        self.state.lock().await.peer(destination)?;
        self.delivery_price(options.gas_dropoff)
    }

    async fn get_version(&self) -> Result<String> {
        self.capabilities.require(Capability::Metadata)?;
        Ok(env!("CARGO_PKG_VERSION").to_string())
    }

    async fn get_custody_address(&self) -> Result<UniversalAddress> {
        self.capabilities.require(Capability::Metadata)?;
        Ok(self.manager)
    }

    async fn get_token_decimals(&self) -> Result<u8> {
        self.capabilities.require(Capability::Metadata)?;
        Ok(self.token_decimals)
    }

    async fn get_current_outbound_capacity(&self) -> Result<u64> {
        self.capabilities.require(Capability::CapacityQuery)?;
        let now = self.clock.now();
        Ok(self.state.lock().await.outbox_rate_limit.capacity_at(now))
    }

    async fn get_current_inbound_capacity(&self, from_chain: ChainId) -> Result<u64> {
        self.capabilities.require(Capability::CapacityQuery)?;
        let now = self.clock.now();
        Ok(self
            .state
            .lock()
            .await
            .inbox_rate_limit(from_chain)?
            .capacity_at(now))
    }

    async fn get_is_approved(&self, attestation: &Attestation) -> Result<bool> {
        self.capabilities.require(Capability::AttestationStatus)?;
        let state = self.state.lock().await;
        let key = Self::inbox_key(&state, attestation)?;
        Ok(state.inbox.contains_key(&key))
    }

    async fn get_is_executed(&self, attestation: &Attestation) -> Result<bool> {
        self.capabilities.require(Capability::AttestationStatus)?;
        let state = self.state.lock().await;
        let key = Self::inbox_key(&state, attestation)?;
        Ok(state
            .inbox
            .get(&key)
            .is_some_and(|item| item.release_status == ReleaseStatus::Released))
    }

    async fn get_inbound_queued_transfer(
        &self,
        from_chain: ChainId,
        message: &NttManagerMessage<NativeTokenTransfer>,
    ) -> Result<Option<InboundQueuedTransfer>> {
        self.capabilities.require(Capability::InboundQueue)?;
        Ok(self
            .state
            .lock()
            .await
            .inbox
            .get(&(from_chain, message.id))
            .and_then(InboxItem::queued))
    }

    async fn complete_inbound_queued_transfer(
        &self,
        from_chain: ChainId,
        message: &NttManagerMessage<NativeTokenTransfer>,
    ) -> Result<Vec<UnsignedTransaction>> {
        self.capabilities.require(Capability::InboundQueue)?;
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let released = instructions::release_inbound(&mut state, (from_chain, message.id), now)?;
        info!(
            chain = %self.chain,
            from_chain = %from_chain,
            id = %hex::encode(released.id),
            amount = released.amount,
            "queued inbound transfer completed"
        );

        Ok(vec![UnsignedTransaction::new(
            self.chain,
            "Ntt.CompleteInboundQueuedTransfer",
            message.id.to_vec(),
        )])
    }

    async fn get_outbound_queued_transfer(
        &self,
        sequence: u64,
    ) -> Result<Option<OutboundQueuedTransfer>> {
        self.capabilities.require(Capability::OutboundQueue)?;
        Ok(self
            .state
            .lock()
            .await
            .outbox
            .get(&sequence)
            .and_then(OutboxItem::queued))
    }

    async fn complete_outbound_queued_transfer(
        &self,
        sequence: u64,
    ) -> Result<Vec<UnsignedTransaction>> {
        self.capabilities.require(Capability::OutboundQueue)?;
        let mut state = self.state.lock().await;
        let now = self.clock.now();

        let message = instructions::release_outbound(&mut state, sequence, now)?;
        info!(chain = %self.chain, sequence, "queued outbound transfer completed");

        Ok(vec![
            UnsignedTransaction::new(
                self.chain,
                "Ntt.CompleteOutboundQueuedTransfer",
                sequence.to_be_bytes().to_vec(),
            ),
            self.publish(&message)?,
        ])
    }
}
