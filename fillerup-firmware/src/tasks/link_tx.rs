//! Companion UART transmit task
//!
//! Sends queued messages one at a time. A push holds the line until the
//! companion answers or [`ANSWER_TIMEOUT`] passes.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::BufferedUartTx;
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use fillerup_core::state::Event;
use fillerup_protocol::{DeliveryError, Dictionary, LinkMessage};

use crate::channels::{EVENT_CHANNEL, LINK_ANSWERED, LINK_TX_CHANNEL};

/// How long a push waits for an ack or nack
const ANSWER_TIMEOUT: Duration = Duration::from_secs(5);

/// Link TX task - writes frames to the companion
#[embassy_executor::task]
pub async fn link_tx_task(mut tx: BufferedUartTx) {
    info!("Link TX task started");

    loop {
        let msg = LINK_TX_CHANNEL.receive().await;

        let pushed = match &msg {
            LinkMessage::Push(dict) => Some(dict.clone()),
            _ => None,
        };

        if let Err(reason) = send(&mut tx, &msg).await {
            if let Some(dict) = pushed {
                failed(dict, reason).await;
            }
            continue;
        }

        let Some(dict) = pushed else {
            continue;
        };

        LINK_ANSWERED.reset();
        let outcome = select(answer_for(&dict), Timer::after(ANSWER_TIMEOUT)).await;
        match outcome {
            Either::First(LinkMessage::Nack { reason, dict }) => {
                debug!("Push rejected: {:?}", reason);
                failed(dict, reason).await;
            }
            Either::First(_) => {
                trace!("Push acknowledged");
                EVENT_CHANNEL.send(Event::OutboxSent(dict)).await;
            }
            Either::Second(()) => {
                warn!("No answer to push");
                failed(dict, DeliveryError::SendTimeout).await;
            }
        }
    }
}

/// Wait for the answer echoing `pushed`, dropping stale ones
async fn answer_for(pushed: &Dictionary) -> LinkMessage {
    loop {
        let answer = LINK_ANSWERED.wait().await;
        if answer.answers(pushed) {
            return answer;
        }
        warn!("Dropping answer for an earlier push");
    }
}

async fn failed(dict: Dictionary, reason: DeliveryError) {
    EVENT_CHANNEL
        .send(Event::OutboxFailed { dict, reason })
        .await;
}

/// Encode and write one message
async fn send(tx: &mut BufferedUartTx, msg: &LinkMessage) -> Result<(), DeliveryError> {
    let bytes = msg
        .to_frame()
        .and_then(|frame| frame.encode_to_vec())
        .map_err(|e| {
            warn!("Failed to encode link message: {:?}", e);
            DeliveryError::Internal
        })?;

    tx.write_all(&bytes).await.map_err(|e| {
        warn!("UART write failed: {:?}", e);
        DeliveryError::NotConnected
    })
}
