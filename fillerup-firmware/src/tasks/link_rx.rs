//! Companion UART receive task
//!
//! Parses frames from the BLE bridge. Pushes are queued for the
//! controller and answered right away; acks and nacks go to
//! `link_tx_task`, which matches them to the push in flight.

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, Error as UartError};
use embedded_io_async::Read;
use fillerup_core::state::Event;
use fillerup_protocol::{DeliveryError, FrameParser, LinkMessage};

use crate::channels::{EVENT_CHANNEL, LINK_ANSWERED, LINK_TX_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - receives and parses frames from the companion
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx) {
    info!("Link RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match LinkMessage::from_frame(&frame) {
                            Ok(msg) => handle_message(msg),
                            Err(e) => {
                                warn!("Undecodable link message: {:?}", e);
                                dropped(DeliveryError::Malformed).await;
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                            dropped(DeliveryError::Malformed).await;
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(UartError::Overrun) => {
                warn!("UART overrun");
                parser.reset();
                dropped(DeliveryError::BufferOverflow).await;
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
                parser.reset();
                dropped(DeliveryError::Malformed).await;
            }
        }
    }
}

async fn dropped(reason: DeliveryError) {
    EVENT_CHANNEL.send(Event::InboxDropped(reason)).await;
}

/// Handle a decoded link message
fn handle_message(msg: LinkMessage) {
    match msg {
        LinkMessage::Push(dict) => {
            debug!("Push with {} tuples", dict.len());
            let reply = match EVENT_CHANNEL.try_send(Event::InboxReceived(dict.clone())) {
                Ok(()) => LinkMessage::Ack(dict),
                Err(_) => {
                    warn!("Event channel full, rejecting push");
                    LinkMessage::Nack {
                        reason: DeliveryError::Busy,
                        dict,
                    }
                }
            };
            if LINK_TX_CHANNEL.try_send(reply).is_err() {
                warn!("Link TX channel full, reply dropped");
            }
        }
        answer => {
            trace!("Answer received");
            LINK_ANSWERED.signal(answer);
        }
    }
}
