//! Browser driver for Figma prototypes over the Chrome DevTools Protocol.
//!
//! ## Usage
//!
//! 1. Start Chrome with remote debugging:
//!    ```bash
//!    chrome --remote-debugging-port=9222
//!    ```
//!
//! 2. Create a driver and open a prototype:
//!    ```rust,ignore
//!    let factory = CdpDriverFactory::new(CdpDriverConfig::default());
//!    let driver = factory.create().await?;
//!    driver.open("https://www.figma.com/proto/...", None).await?;
//!    ```

pub mod cdp;
mod driver;
mod scripts;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use driver::{node_id_from_url, swipe_path, CdpBrowserDriver, CdpDriverConfig, CdpDriverFactory};
