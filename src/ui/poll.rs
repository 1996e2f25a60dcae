//! Bounded poll for a UI condition: dump, parse, check, wait, repeat.

use std::time::Duration;

use tracing::debug;

use crate::device::Device;
use crate::error::Result;
use crate::ui::provider::{FileDumpProvider, HierarchyProvider};
use crate::ui::{parse_hierarchy, Selector, UiNode};

/// Fixed wait between attempts.
pub const POLL_STEP: Duration = Duration::from_millis(200);

/// Poll the provider until `selector` matches a node or the attempt budget
/// runs out. Returns the parsed ROOT of the last dump, not the matched node.
///
/// With no selector the loop body runs exactly once, whatever the timeout:
/// one dump-and-parse, then return whatever was captured. With a selector
/// that never matches, the budget is `floor(timeout / step)` attempts (at
/// least one) and the result is `None`. Dump and parse errors end the poll
/// immediately.
pub fn wait_for_hierarchy(
    provider: &mut dyn HierarchyProvider,
    selector: Option<&Selector>,
    timeout: Duration,
) -> Result<Option<UiNode>> {
    wait_for_hierarchy_with(provider, selector, timeout, POLL_STEP, &mut std::thread::sleep)
}

pub fn wait_for_hierarchy_with(
    provider: &mut dyn HierarchyProvider,
    selector: Option<&Selector>,
    timeout: Duration,
    step: Duration,
    sleep: &mut dyn FnMut(Duration),
) -> Result<Option<UiNode>> {
    let attempts = attempt_budget(timeout, step);
    let mut last: Option<UiNode> = None;

    for attempt in 0..attempts {
        let xml = provider.dump_hierarchy()?;
        let root = parse_hierarchy(&xml)?;
        let matched = selector.map_or(true, |sel| root.find(sel).is_some());
        last = Some(root);
        if matched {
            break;
        }
        debug!(attempt, "selector not yet on screen, waiting");
        sleep(step);
    }

    let Some(root) = last else {
        return Ok(None);
    };
    if let Some(sel) = selector {
        if root.find(sel).is_none() {
            return Ok(None);
        }
    }
    Ok(Some(root))
}

fn attempt_budget(timeout: Duration, step: Duration) -> u64 {
    let step_ms = step.as_millis().max(1) as u64;
    let budget = timeout.as_millis() as u64 / step_ms;
    budget.max(1)
}

impl Device {
    /// Poll the on-device file dump until `selector` matches. See
    /// [`wait_for_hierarchy`].
    pub fn ui_hierarchy(
        &self,
        selector: Option<&Selector>,
        timeout: Duration,
    ) -> Result<Option<UiNode>> {
        let mut provider = FileDumpProvider::new(self);
        wait_for_hierarchy_with(
            &mut provider,
            selector,
            timeout,
            self.poll_step(),
            &mut std::thread::sleep,
        )
    }

    /// One-shot hierarchy capture as raw XML, without polling.
    pub fn dump_hierarchy_xml(&self) -> Result<String> {
        FileDumpProvider::new(self).dump_hierarchy()
    }
}
