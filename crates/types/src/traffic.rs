//! Traffic classes offered to each simulated network.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A class of application traffic that a subset of stations takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrafficClass {
    /// Video on demand streamed from the access point.
    VideoOnDemand,
    /// Video on demand in the reverse direction.
    VideoOnDemandReverse,
    /// Web browsing.
    Http,
    /// 3GPP FTP Model 2 file transfers.
    Ftp,
    /// Interactive gaming.
    Gaming,
    /// Voice over IP.
    Voip,
}

impl TrafficClass {
    /// All classes, in the order a traffic plan selects participants.
    pub const ALL: [TrafficClass; 6] = [
        TrafficClass::VideoOnDemand,
        TrafficClass::VideoOnDemandReverse,
        TrafficClass::Http,
        TrafficClass::Ftp,
        TrafficClass::Gaming,
        TrafficClass::Voip,
    ];

    /// Mean fraction of stations taking part in this class.
    pub fn default_fraction(self) -> f64 {
        match self {
            TrafficClass::VideoOnDemand => 0.6,
            TrafficClass::VideoOnDemandReverse => 0.1,
            TrafficClass::Http => 0.4,
            TrafficClass::Ftp => 0.2,
            TrafficClass::Gaming => 0.3,
            TrafficClass::Voip => 0.2,
        }
    }

    /// Well-known port for the class's applications.
    pub fn default_port(self) -> u16 {
        match self {
            TrafficClass::VideoOnDemand | TrafficClass::VideoOnDemandReverse => 5050,
            TrafficClass::Http => 80,
            TrafficClass::Ftp => 5150,
            TrafficClass::Gaming => 5250,
            TrafficClass::Voip => 5350,
        }
    }
}

impl fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrafficClass::VideoOnDemand => "vod",
            TrafficClass::VideoOnDemandReverse => "vod-reverse",
            TrafficClass::Http => "http",
            TrafficClass::Ftp => "ftp",
            TrafficClass::Gaming => "gaming",
            TrafficClass::Voip => "voip",
        };
        f.write_str(name)
    }
}
