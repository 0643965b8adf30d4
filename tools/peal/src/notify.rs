//! x10.basic command handling
//!
//! Plays the bank's sound for each on/off command addressed to us (or
//! broadcast), then confirms the command on the bus the way an X10
//! transmitter would: an xpl-trig echo of the command followed by the
//! same body under x10.confirm. Some listeners only honor one of the
//! two, so both go out.

use tracing::{debug, warn};

use peal_audio::{play_wav, PcmSink, SoundBank, Switch};
use peal_proto::{header, message_type, Message, TARGET_ALL};
use peal_service::AppService;

const X10_BASIC: &str = "x10.basic";
const X10_CONFIRM: &str = "x10.confirm";

/// Register the x10.basic command handler on `service`.
pub fn register(service: &mut AppService, bank: SoundBank, mut sink: Box<dyn PcmSink + Send>) {
    let handle = service.handle();
    service.register(message_type::COMMAND, X10_BASIC, move |msg| {
        notify(msg, &bank, sink.as_mut(), |reply| handle.send(reply));
    });
}

// TODO: hand playback to a blocking worker so a long sample cannot
// stall the service loop.
fn notify(
    msg: &Message,
    bank: &SoundBank,
    sink: &mut dyn PcmSink,
    mut send: impl FnMut(Message),
) {
    let command = match msg.body_value("command") {
        Some(command) => command,
        None => return,
    };
    let device = match msg.body_value("device") {
        Some(device) => device,
        None => return,
    };
    let switch = match Switch::from_command(command) {
        Some(switch) => switch,
        None => {
            debug!("ignoring unsupported command {}", command);
            return;
        }
    };
    let path = match bank.lookup(device, switch) {
        Some(path) => path.to_path_buf(),
        None => {
            debug!("no sound for device {}", device);
            return;
        }
    };

    debug!("{} {} -> {}", device, command, path.display());
    if let Err(e) = play_wav(sink, &path) {
        warn!("playback of {} failed: {}", path.display(), e);
    }

    let mut reply = msg.clone();
    reply.message_type = message_type::TRIGGER.to_string();
    reply
        .headers
        .insert(header::TARGET.to_string(), TARGET_ALL.to_string());
    send(reply.clone());

    let mut confirm = reply;
    confirm.schema = X10_CONFIRM.to_string();
    send(confirm);
}
