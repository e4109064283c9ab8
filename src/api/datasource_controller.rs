use tracing::{debug, info, warn};

use crate::datasource::{Datasource, DatasourceEvent, Dispatcher};
use crate::error::{ChartError, ChartResult};
use crate::render::Renderer;

use super::Chart;
use super::chart::AttachedSource;

impl<R: Renderer> Chart<R> {
    /// Attaches `source`, stopping a previously attached one. The source is
    /// configured with a dispatcher feeding [`Chart::pump_events`].
    pub fn datasource(&mut self, mut source: Box<dyn Datasource>) -> ChartResult<()> {
        self.stop_datasource()?;
        let (dispatcher, events) = Dispatcher::channel();
        source.configure(dispatcher);
        self.source = Some(AttachedSource { source, events });
        debug!(kind = self.kind.name(), "datasource attached");
        Ok(())
    }

    pub fn start_datasource(&mut self) -> ChartResult<()> {
        match self.source.as_mut() {
            Some(attached) => attached.source.start(),
            None => Err(ChartError::Datasource("no datasource attached".to_owned())),
        }
    }

    pub fn stop_datasource(&mut self) -> ChartResult<()> {
        match self.source.as_mut() {
            Some(attached) => attached.source.stop(),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn datasource_running(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|attached| attached.source.is_running())
    }

    /// Drains pending data-source events without blocking and applies them.
    /// Returns how many events were handled.
    ///
    /// A fatal transport event stops the source and is returned as
    /// `ChartError::Datasource`.
    pub fn pump_events(&mut self) -> ChartResult<usize> {
        let Some(attached) = self.source.as_ref() else {
            return Ok(0);
        };
        let pending: Vec<DatasourceEvent> = attached.events.try_iter().collect();
        let handled = pending.len();
        for event in pending {
            self.handle_datasource_event(event)?;
        }
        Ok(handled)
    }

    /// Applies one data-source event.
    pub fn handle_datasource_event(&mut self, event: DatasourceEvent) -> ChartResult<()> {
        match event {
            DatasourceEvent::Open => {
                info!(kind = self.kind.name(), "datasource open");
                Ok(())
            }
            DatasourceEvent::Message(payload) => match self.keep_drawing_json(payload) {
                Err(ChartError::InvalidData(reason)) => {
                    warn!(reason = reason.as_str(), "datasource message skipped");
                    Ok(())
                }
                other => other,
            },
            DatasourceEvent::Error(reason) => {
                warn!(reason = reason.as_str(), "datasource error");
                Ok(())
            }
            DatasourceEvent::AddLoading => {
                self.container.add_loading_icon();
                self.render()
            }
            DatasourceEvent::RemoveLoading => {
                self.container.remove_loading_icon();
                self.render()
            }
            DatasourceEvent::Fatal(reason) => {
                warn!(reason = reason.as_str(), "datasource failed");
                self.stop_datasource()?;
                Err(ChartError::Datasource(reason))
            }
        }
    }
}
