use cre::{Value, WidgetConfig};
use wasm_bindgen::prelude::*;

fn counter() -> WidgetConfig {
    WidgetConfig::new(|state, _| {
        format!(
            r#"<div class="counter">
  <button @click="add(-1)">-</button>
  <span>{}</span>
  <button @click="add(1)">+</button>
  <button @click="add(10, big)">+10</button>
  <button @click="reset">reset</button>
</div>"#,
            state.get("count").unwrap_or_default()
        )
    })
    .state("count", 0)
    .action("add", |state, args| {
        let by = args.first().and_then(Value::as_f64).unwrap_or(1.0);
        let count = state.get_f64("count").unwrap_or(0.0) + by;
        state.set("count", count);
        if args.get(1).and_then(Value::as_str) == Some("big") {
            tracing::info!(count, "big step");
        }
        cre::emit("score", count);
    })
    .action("reset", |state, _| {
        state.set("count", 0);
        cre::emit("score", 0);
    })
    .on("dblclick", |state, _event| {
        tracing::debug!(count = ?state.get("count"), "double click");
    })
}

fn scoreboard() -> WidgetConfig {
    WidgetConfig::new(|state, _| {
        format!(
            "<p>last score: {} ({} updates)</p>",
            state.get("last").unwrap_or_default(),
            state.get("updates").unwrap_or_default(),
        )
    })
    .state("last", Value::Null)
    .state("updates", 0)
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_report_logs_in_timings(false)
            .set_console_config(tracing_wasm::ConsoleConfig::ReportWithoutConsoleColor)
            .build(),
    );
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    cre::ate("cre-counter", counter()).map_err(|err| JsValue::from(err.to_string()))?;
    cre::ate("cre-scoreboard", scoreboard()).map_err(|err| JsValue::from(err.to_string()))?;

    cre::on("score", |detail| {
        let Some(board) = cre::get("#scoreboard") else {
            tracing::warn!("no scoreboard on the page");
            return;
        };
        let state = board.state();
        state.set("last", detail.as_f64());
        state.update("updates", |v| *v = Value::from(v.as_f64().unwrap_or(0.0) + 1.0));
    });

    Ok(())
}
