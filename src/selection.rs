/// Visibility of a single creation form. Every open or close bumps the epoch,
/// so a ticket taken before an await can tell whether the form it was issued
/// for is still the one on screen.
#[derive(Debug, Clone, Default)]
pub struct FormSlot<K> {
    key: Option<K>,
    epoch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTicket<K> {
    pub key: K,
    epoch: u64,
}

impl<K: Clone + PartialEq> FormSlot<K> {
    pub fn open(&mut self, key: K) {
        self.key = Some(key);
        self.epoch += 1;
    }

    pub fn close(&mut self) {
        if self.key.take().is_some() {
            self.epoch += 1;
        }
    }

    pub fn toggle(&mut self, key: K) {
        if self.is_open_for(&key) {
            self.close();
        } else {
            self.open(key);
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn is_open_for(&self, key: &K) -> bool {
        self.key.as_ref() == Some(key)
    }

    pub fn ticket(&self) -> Option<FormTicket<K>> {
        self.key.clone().map(|key| FormTicket {
            key,
            epoch: self.epoch,
        })
    }

    pub fn is_current(&self, ticket: &FormTicket<K>) -> bool {
        self.epoch == ticket.epoch && self.is_open_for(&ticket.key)
    }
}

/// Which tank card is expanded and which nested creation forms are showing.
#[derive(Debug, Clone, Default)]
pub struct TankSelection {
    open_tank: Option<String>,
    pub parameter_form: FormSlot<String>,
    pub water_change_form: FormSlot<String>,
}

impl TankSelection {
    pub fn open_tank(&self) -> Option<&str> {
        self.open_tank.as_deref()
    }

    pub fn is_open(&self, tank_id: &str) -> bool {
        self.open_tank.as_deref() == Some(tank_id)
    }

    /// Header click. Either direction hides every creation form.
    pub fn toggle_tank(&mut self, tank_id: &str) {
        if self.is_open(tank_id) {
            self.open_tank = None;
        } else {
            self.open_tank = Some(tank_id.to_string());
        }
        self.parameter_form.close();
        self.water_change_form.close();
    }

    pub fn toggle_parameter_form(&mut self, tank_id: &str) {
        self.parameter_form.toggle(tank_id.to_string());
    }

    pub fn toggle_water_change_form(&mut self, tank_id: &str) {
        self.water_change_form.toggle(tank_id.to_string());
    }

    pub fn close_parameter_form(&mut self, tank_id: &str) {
        if self.parameter_form.is_open_for(&tank_id.to_string()) {
            self.parameter_form.close();
        }
    }

    pub fn close_water_change_form(&mut self, tank_id: &str) {
        if self.water_change_form.is_open_for(&tank_id.to_string()) {
            self.water_change_form.close();
        }
    }

    pub fn clear(&mut self) {
        self.open_tank = None;
        self.parameter_form.close();
        self.water_change_form.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_starts_closed() {
        let selection = TankSelection::default();
        assert_eq!(selection.open_tank(), None);
        assert!(selection.parameter_form.key().is_none());
        assert!(selection.water_change_form.key().is_none());
    }

    #[test]
    fn opening_another_tank_closes_the_first_and_all_forms() {
        let mut selection = TankSelection::default();
        selection.toggle_tank("a");
        selection.toggle_parameter_form("a");
        selection.toggle_water_change_form("a");

        selection.toggle_tank("b");

        assert_eq!(selection.open_tank(), Some("b"));
        assert!(!selection.is_open("a"));
        assert!(selection.parameter_form.key().is_none());
        assert!(selection.water_change_form.key().is_none());
    }

    #[test]
    fn header_click_on_open_tank_closes_it() {
        let mut selection = TankSelection::default();
        selection.toggle_tank("a");
        selection.toggle_parameter_form("a");

        selection.toggle_tank("a");

        assert_eq!(selection.open_tank(), None);
        assert!(selection.parameter_form.key().is_none());
    }

    #[test]
    fn form_triggers_toggle_independently() {
        let mut selection = TankSelection::default();
        selection.toggle_tank("a");

        selection.toggle_parameter_form("a");
        selection.toggle_water_change_form("a");
        assert!(selection.parameter_form.is_open_for(&"a".to_string()));
        assert!(selection.water_change_form.is_open_for(&"a".to_string()));

        selection.toggle_parameter_form("a");
        assert!(selection.parameter_form.key().is_none());
        assert!(selection.water_change_form.is_open_for(&"a".to_string()));
    }

    #[test]
    fn only_one_parameter_form_system_wide() {
        let mut selection = TankSelection::default();
        selection.toggle_parameter_form("a");
        selection.toggle_parameter_form("b");
        assert_eq!(selection.parameter_form.key().map(String::as_str), Some("b"));
    }

    #[test]
    fn closing_a_form_for_another_tank_is_a_no_op() {
        let mut selection = TankSelection::default();
        selection.toggle_water_change_form("a");
        selection.close_water_change_form("b");
        assert!(selection.water_change_form.is_open_for(&"a".to_string()));
    }

    #[test]
    fn ticket_goes_stale_after_close_or_reopen() {
        let mut slot = FormSlot::default();
        slot.open("a".to_string());
        let ticket = slot.ticket().unwrap();
        assert!(slot.is_current(&ticket));

        slot.close();
        assert!(!slot.is_current(&ticket));

        slot.open("a".to_string());
        assert!(!slot.is_current(&ticket));
        assert!(slot.is_current(&slot.ticket().unwrap()));
    }
}
