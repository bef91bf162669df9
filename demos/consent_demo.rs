use cookie_consent::cookies::{JsonCookieStore, PersistentCookieJar};
use cookie_consent::events::{UserAction, WidgetEvent};
use cookie_consent::view::{MountPoint, WidgetContainer};
use cookie_consent::{ConsentCallbacks, ConsentConfig, ConsentError, ConsentWidget, WidgetOptions};
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

/// Mount point that prints the container to stdout instead of building DOM nodes.
struct ConsoleMount;

impl MountPoint for ConsoleMount {
    fn name(&self) -> &str {
        "ConsoleMount"
    }

    fn attach(&mut self, container: &WidgetContainer) -> anyhow::Result<()> {
        println!("<div id=\"{}\">", container.element_id);
        println!("  prompt: {}", container.prompt.title);
        println!("  settings: {}", container.settings.title);
        for block in &container.settings.blocks {
            match (&block.toggle, &block.table) {
                (Some(toggle), Some(table)) => println!(
                    "    [{}] {} ({}, {} cookie rows, panel #{})",
                    if toggle.initially_checked { "x" } else { " " },
                    block.title,
                    toggle.category,
                    table.rows.len(),
                    toggle.panel_id,
                ),
                _ => println!("    {}", block.title),
            }
        }
        println!("</div>");
        Ok(())
    }

    fn detach(&mut self, container: &WidgetContainer) {
        println!("removed #{}", container.element_id);
    }
}

#[tokio::main]
async fn main() -> Result<(), ConsentError> {
    env_logger::init();

    // The texts of both dialogs. The JSON uses the same field names as the web widget.
    let config = ConsentConfig::from_json_str(include_str!("consent.json"))?;

    // Runtime options. The storage scope is derived from the page URL: a page on
    // shop.example.com stores its decision for example.com.
    let page = Url::parse("https://shop.example.com/checkout").map_err(|e| ConsentError::Config(e.to_string()))?;
    let options = WidgetOptions::builder()
        .page_url(&page)
        .presentation_delay(Duration::from_millis(150))
        .build()?;

    // Cookies survive restarts of the demo: the jar is persisted to a JSON file. Run the
    // demo twice to see the prompt being skipped the second time.
    let store = JsonCookieStore::new(std::env::temp_dir().join("cookie-consent-demo.json"));
    let jar = PersistentCookieJar::open(store).map_err(|e| ConsentError::Storage(format!("{:#}", e)))?;

    let callbacks = ConsentCallbacks::new(
        |categories| println!("Accept All: {:?}", categories),
        |categories| println!("Reject All: {:?}", categories),
        |categories| println!("Save Settings: {:?}", categories),
    );

    let mut widget = ConsentWidget::initialize(Box::new(ConsoleMount), config, options, jar, callbacks)?;
    widget.wire_interactions();
    widget.present();

    // Move the widget onto its own task. From here on it is driven through the handle.
    let (handle, join_handle) = widget.start();

    let mut event_rx = handle.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            println!("event: {:?}", event);
            if matches!(event, WidgetEvent::TornDown { .. }) {
                break;
            }
        }
    });

    // Give the prompt time to appear, then play a visitor who opens the settings,
    // enables statistics and saves.
    sleep(Duration::from_millis(300)).await;
    handle.activate("c-settings").await?;
    handle.dispatch(UserAction::ToggleDetails("analytics".into())).await?;
    handle.dispatch(UserAction::ToggleCategory("analytics".into())).await?;
    handle.activate("s-sv-bn").await?;

    let snapshot = handle.snapshot().await?;
    println!("stored consent: {:?}", snapshot.stored);

    handle.teardown().await?;
    let _ = join_handle.await;
    let _ = printer.await;

    Ok(())
}
