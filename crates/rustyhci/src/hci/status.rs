//! Controller status codes
//!
//! Every non-zero status byte a controller can return in a Command Status
//! or Command Complete event, named after Bluetooth Core Vol 1, Part F.
//! A zero status means success and never becomes a [`StatusCode`].

use thiserror::Error;

macro_rules! status_codes {
    ($($(#[$doc:meta])* $name:ident = $code:literal => $text:tt,)+) => {
        /// A non-zero HCI status, as reported by the controller
        #[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum StatusCode {
            $(
                $(#[$doc])*
                #[error($text)]
                $name,
            )+
            /// A reserved or not yet assigned status value
            #[error("Unknown status 0x{0:02x}")]
            Unknown(u8),
        }

        impl StatusCode {
            /// Maps a raw status byte. Returns `None` for 0x00 (success).
            pub fn from_status(status: u8) -> Option<StatusCode> {
                match status {
                    0x00 => None,
                    $($code => Some(StatusCode::$name),)+
                    other => Some(StatusCode::Unknown(other)),
                }
            }

            /// The raw status byte
            pub fn code(&self) -> u8 {
                match self {
                    $(StatusCode::$name => $code,)+
                    StatusCode::Unknown(code) => *code,
                }
            }
        }
    };
}

status_codes! {
    UnknownCommand = 0x01 => "Unknown HCI Command",
    UnknownConnectionId = 0x02 => "Unknown Connection Identifier",
    HardwareFailure = 0x03 => "Hardware Failure",
    PageTimeout = 0x04 => "Page Timeout",
    AuthenticationFailure = 0x05 => "Authentication Failure",
    PinOrKeyMissing = 0x06 => "PIN or Key Missing",
    MemoryCapacityExceeded = 0x07 => "Memory Capacity Exceeded",
    ConnectionTimeout = 0x08 => "Connection Timeout",
    ConnectionLimitExceeded = 0x09 => "Connection Limit Exceeded",
    SyncConnectionLimitExceeded = 0x0A => "Synchronous Connection Limit To A Device Exceeded",
    ConnectionAlreadyExists = 0x0B => "Connection Already Exists",
    CommandDisallowed = 0x0C => "Command Disallowed",
    RejectedLimitedResources = 0x0D => "Connection Rejected due to Limited Resources",
    RejectedSecurity = 0x0E => "Connection Rejected Due To Security Reasons",
    RejectedUnacceptableBdAddr = 0x0F => "Connection Rejected due to Unacceptable BD_ADDR",
    AcceptTimeoutExceeded = 0x10 => "Connection Accept Timeout Exceeded",
    UnsupportedFeature = 0x11 => "Unsupported Feature or Parameter Value",
    InvalidParameters = 0x12 => "Invalid HCI Command Parameters",
    RemoteUserTerminated = 0x13 => "Remote User Terminated Connection",
    RemoteLowResources = 0x14 => "Remote Device Terminated Connection due to Low Resources",
    RemotePowerOff = 0x15 => "Remote Device Terminated Connection due to Power Off",
    TerminatedByLocalHost = 0x16 => "Connection Terminated By Local Host",
    RepeatedAttempts = 0x17 => "Repeated Attempts",
    PairingNotAllowed = 0x18 => "Pairing Not Allowed",
    UnknownLmpPdu = 0x19 => "Unknown LMP PDU",
    UnsupportedRemoteFeature = 0x1A => "Unsupported Remote Feature",
    ScoOffsetRejected = 0x1B => "SCO Offset Rejected",
    ScoIntervalRejected = 0x1C => "SCO Interval Rejected",
    ScoAirModeRejected = 0x1D => "SCO Air Mode Rejected",
    InvalidLmpParameters = 0x1E => "Invalid LMP Parameters / Invalid LL Parameters",
    UnspecifiedError = 0x1F => "Unspecified Error",
    UnsupportedLmpParameterValue = 0x20 => "Unsupported LMP Parameter Value / Unsupported LL Parameter Value",
    RoleChangeNotAllowed = 0x21 => "Role Change Not Allowed",
    LmpResponseTimeout = 0x22 => "LMP Response Timeout / LL Response Timeout",
    LmpTransactionCollision = 0x23 => "LMP Error Transaction Collision / LL Procedure Collision",
    LmpPduNotAllowed = 0x24 => "LMP PDU Not Allowed",
    EncryptionModeNotAcceptable = 0x25 => "Encryption Mode Not Acceptable",
    LinkKeyCannotBeChanged = 0x26 => "Link Key cannot be Changed",
    RequestedQosNotSupported = 0x27 => "Requested QoS Not Supported",
    InstantPassed = 0x28 => "Instant Passed",
    PairingWithUnitKeyNotSupported = 0x29 => "Pairing With Unit Key Not Supported",
    DifferentTransactionCollision = 0x2A => "Different Transaction Collision",
    QosUnacceptableParameter = 0x2C => "QoS Unacceptable Parameter",
    QosRejected = 0x2D => "QoS Rejected",
    ChannelClassificationNotSupported = 0x2E => "Channel Classification Not Supported",
    InsufficientSecurity = 0x2F => "Insufficient Security",
    ParameterOutOfRange = 0x30 => "Parameter Out Of Mandatory Range",
    RoleSwitchPending = 0x32 => "Role Switch Pending",
    ReservedSlotViolation = 0x34 => "Reserved Slot Violation",
    RoleSwitchFailed = 0x35 => "Role Switch Failed",
    ExtendedInquiryResponseTooLarge = 0x36 => "Extended Inquiry Response Too Large",
    SimplePairingNotSupportedByHost = 0x37 => "Secure Simple Pairing Not Supported By Host",
    HostBusyPairing = 0x38 => "Host Busy - Pairing",
    NoSuitableChannelFound = 0x39 => "Connection Rejected due to No Suitable Channel Found",
    ControllerBusy = 0x3A => "Controller Busy",
    UnacceptableConnectionParameters = 0x3B => "Unacceptable Connection Parameters",
    AdvertisingTimeout = 0x3C => "Advertising Timeout",
    TerminatedMicFailure = 0x3D => "Connection Terminated due to MIC Failure",
    ConnectionFailedToEstablish = 0x3E => "Connection Failed to be Established",
    /// Formerly "MAC Connection Failed"
    MacConnectionFailed = 0x3F => "MAC Connection Failed",
    CoarseClockAdjustmentRejected = 0x40 => "Coarse Clock Adjustment Rejected but Will Try to Adjust Using Clock Dragging",
    Type0SubmapNotDefined = 0x41 => "Type0 Submap Not Defined",
    UnknownAdvertisingId = 0x42 => "Unknown Advertising Identifier",
    LimitReached = 0x43 => "Limit Reached",
    OperationCancelledByHost = 0x44 => "Operation Cancelled by Host",
    PacketTooLong = 0x45 => "Packet Too Long",
}

impl TryFrom<u8> for StatusCode {
    type Error = u8;

    /// Fails with the input byte when it is 0x00 (success).
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StatusCode::from_status(value).ok_or(value)
    }
}

impl From<StatusCode> for u8 {
    fn from(value: StatusCode) -> Self {
        value.code()
    }
}

/// Turns a leading status byte into `Err` when non-zero.
pub fn check_status(status: u8) -> Result<(), StatusCode> {
    match StatusCode::from_status(status) {
        Some(code) => Err(code),
        None => Ok(()),
    }
}
