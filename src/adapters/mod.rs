//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to                   |
//! |-----------------|--------------------|-------------------------------|
//! | `hardware`      | SensorPort         | ESP32 ADC1                    |
//! |                 | ActuatorPort       | Servo (LEDC PWM)              |
//! |                 | IndicatorPort      | Status LED GPIO               |
//! |                 | DisplayPort        | LED matrix (I²C)              |
//! | `http_listener` | NetworkPort        | TCP port 80 (lwIP / std::net) |
//! |                 | Connection         |                               |
//! | `log_sink`      | EventSink          | Serial log output             |
//! | `time`          | -                  | ESP32 system timer            |
//! | `wifi`          | -                  | ESP-IDF WiFi STA + DHCP       |

pub mod hardware;
pub mod http_listener;
pub mod log_sink;
pub mod time;
pub mod wifi;
