//! Host-side counters fed by the scene's callbacks

use morii::HostUi;

#[derive(Debug, Default)]
pub struct CounterPanel {
    pub entities: usize,
    pub connections: usize,
    pub peak_connections: usize,
}

impl HostUi for CounterPanel {
    fn on_entity_count_change(&mut self, count: usize) {
        if count != self.entities {
            log::debug!("panel: stains {} -> {}", self.entities, count);
        }
        self.entities = count;
    }

    fn on_connection_count_change(&mut self, count: usize) {
        if count != self.connections {
            log::debug!("panel: connections {} -> {}", self.connections, count);
        }
        self.connections = count;
        self.peak_connections = self.peak_connections.max(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_latest_and_peak() {
        let mut panel = CounterPanel::default();
        panel.on_entity_count_change(33);
        panel.on_connection_count_change(2);
        panel.on_connection_count_change(5);
        panel.on_connection_count_change(1);
        assert_eq!(panel.entities, 33);
        assert_eq!(panel.connections, 1);
        assert_eq!(panel.peak_connections, 5);
    }
}
