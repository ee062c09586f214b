use honggfuzz::fuzz;
use ntt_messages::{
    ntt::NativeTokenTransfer,
    ntt_manager::NttManagerMessage,
    transceiver::{TransceiverMessage, TransceiverPrefix},
};

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let Ok((prefix, message)) = TransceiverMessage::<Vec<u8>, Vec<u8>>::decode(
                data,
                &[TransceiverPrefix::WORMHOLE],
            ) else {
                return;
            };

            // whatever splits must re-encode to the same bytes
            assert_eq!(message.encode(prefix).ok().as_deref(), Some(data));

            let _ = message.parse_manager_payload::<NttManagerMessage<NativeTokenTransfer>>();
        });
    }
}
