//! WiFi station-mode adapter.
//!
//! One-shot bring-up at boot: validate credentials, associate, wait for a
//! DHCP lease.  Both waits are bounded; when either runs out the firmware
//! carries on without the HTTP responder.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation that "associates" instantly on loopback.

use core::fmt;
use core::net::Ipv4Addr;
use core::time::Duration;

use log::{info, warn};

use crate::config::SystemConfig;

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, ClientConfiguration, Configuration, EspWifi},
};

/// Delay between association / DHCP polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    /// The radio could not be brought up at all.
    ModemUnavailable(i32),
    /// Driver call failed after the radio was up.
    Driver(i32),
    AssociationTimeout,
    DhcpTimeout,
}

impl ConnectivityError {
    /// `true` when the device cannot usefully continue.  Every other
    /// failure degrades to network-less operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ModemUnavailable(_))
    }
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ModemUnavailable(rc) => write!(f, "WiFi module not detected (rc={})", rc),
            Self::Driver(rc) => write!(f, "WiFi driver error (rc={})", rc),
            Self::AssociationTimeout => write!(f, "association timed out"),
            Self::DhcpTimeout => write!(f, "no DHCP address"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WifiCredentials<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

impl WifiCredentials<'static> {
    /// Credentials baked in at build time from `VOLTSERVO_WIFI_SSID` /
    /// `VOLTSERVO_WIFI_PASS`.  Unset means empty.
    pub fn from_build_env() -> Self {
        Self {
            ssid: option_env!("VOLTSERVO_WIFI_SSID").unwrap_or(""),
            password: option_env!("VOLTSERVO_WIFI_PASS").unwrap_or(""),
        }
    }
}

impl WifiCredentials<'_> {
    pub fn validate(&self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        validate_ssid(self.ssid)?;
        validate_password(self.password)
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Bounded polling
// ───────────────────────────────────────────────────────────────

/// Poll until `poll` yields a value, sleeping `interval` between polls.
///
/// Polls once immediately, then up to `retries` more times, so at most
/// `retries` sleeps happen.  Returns `None` if every poll came back empty.
pub fn poll_with_retries<T>(
    retries: u32,
    interval: Duration,
    mut poll: impl FnMut() -> Option<T>,
    mut sleep: impl FnMut(Duration),
) -> Option<T> {
    if let Some(v) = poll() {
        return Some(v);
    }
    for _ in 0..retries {
        sleep(interval);
        if let Some(v) = poll() {
            return Some(v);
        }
    }
    None
}

fn thread_sleep(d: Duration) {
    std::thread::sleep(d);
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

/// A station that is associated and holds an address.  Dropping it tears
/// the connection down.
pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    _wifi: Box<EspWifi<'static>>,
    ip: Ipv4Addr,
    rssi: Option<i8>,
}

impl WifiAdapter {
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    pub fn rssi(&self) -> Option<i8> {
        self.rssi
    }

    /// Bring the station up and wait for an address.
    #[cfg(target_os = "espidf")]
    pub fn start(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        creds: &WifiCredentials<'_>,
        cfg: &SystemConfig,
    ) -> Result<Self, ConnectivityError> {
        let mut wifi = Box::new(
            EspWifi::new(modem, sysloop, nvs)
                .map_err(|e| ConnectivityError::ModemUnavailable(e.code()))?,
        );

        creds.validate()?;
        info!("WiFi: connecting to '{}'", creds.ssid);

        let client = ClientConfiguration {
            ssid: creds.ssid.try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: creds
                .password
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method: if creds.password.is_empty() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            },
            ..Default::default()
        };
        let driver = |e: esp_idf_svc::sys::EspError| ConnectivityError::Driver(e.code());
        wifi.set_configuration(&Configuration::Client(client)).map_err(driver)?;
        wifi.start().map_err(driver)?;
        wifi.connect().map_err(driver)?;

        poll_with_retries(
            cfg.wifi_connect_window_secs,
            POLL_INTERVAL,
            || wifi.is_connected().unwrap_or(false).then_some(()),
            thread_sleep,
        )
        .ok_or(ConnectivityError::AssociationTimeout)?;

        let rssi = sta_rssi();
        info!("WiFi: associated (RSSI={:?})", rssi);

        info!("WiFi: waiting for DHCP address");
        let ip = poll_with_retries(
            cfg.dhcp_poll_attempts,
            POLL_INTERVAL,
            || {
                wifi.sta_netif()
                    .get_ip_info()
                    .ok()
                    .map(|info| info.ip)
                    .filter(|ip| !ip.is_unspecified())
            },
            thread_sleep,
        )
        .ok_or(ConnectivityError::DhcpTimeout)?;

        info!("WiFi: IP obtained {}", ip);
        Ok(Self { _wifi: wifi, ip, rssi })
    }

    /// Simulated bring-up: validates the credentials, then binds to loopback.
    #[cfg(not(target_os = "espidf"))]
    pub fn start(
        creds: &WifiCredentials<'_>,
        cfg: &SystemConfig,
    ) -> Result<Self, ConnectivityError> {
        creds.validate()?;
        info!("WiFi(sim): connecting to '{}'", creds.ssid);
        let ip = poll_with_retries(
            cfg.dhcp_poll_attempts,
            POLL_INTERVAL,
            || Some(Ipv4Addr::LOCALHOST),
            thread_sleep,
        )
        .ok_or(ConnectivityError::DhcpTimeout)?;
        info!("WiFi(sim): IP obtained {}", ip);
        Ok(Self { ip, rssi: Some(-60) })
    }
}

#[cfg(target_os = "espidf")]
fn sta_rssi() -> Option<i8> {
    let mut ap = esp_idf_svc::sys::wifi_ap_record_t::default();
    // SAFETY: fills a caller-owned record; station is associated.
    let ret = unsafe { esp_idf_svc::sys::esp_wifi_sta_get_ap_info(&mut ap) };
    if ret == esp_idf_svc::sys::ESP_OK {
        Some(ap.rssi)
    } else {
        warn!("WiFi: RSSI query failed (rc={})", ret);
        None
    }
}

/// Log the outcome of bring-up the way the serial console expects it.
pub fn log_bringup(result: &Result<WifiAdapter, ConnectivityError>, port: u16) {
    match result {
        Ok(wifi) if port == 80 => info!("WiFi: open http://{}", wifi.ip()),
        Ok(wifi) => info!("WiFi: open http://{}:{}", wifi.ip(), port),
        Err(ConnectivityError::DhcpTimeout) => {
            warn!("WiFi: no IP address, check the router's DHCP server");
        }
        Err(e) => warn!("WiFi: {}", e),
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
