use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

impl DatePart {
    fn width(self) -> usize {
        match self {
            DatePart::Day | DatePart::Month => 2,
            DatePart::Year => 4,
        }
    }
}

/// Segmented `DD.MM.YYYY` editor for the invoice date.
pub struct DateInputState {
    pub date: NaiveDate,
    pub date_part: DatePart,
    pending: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            date_part: DatePart::Day,
            pending: String::new(),
        }
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Day => DatePart::Month,
            DatePart::Month => DatePart::Year,
            DatePart::Year => DatePart::Day,
        };
        self.pending.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Day => DatePart::Year,
            DatePart::Month => DatePart::Day,
            DatePart::Year => DatePart::Month,
        };
        self.pending.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.pending.push(c);
                if self.pending.len() == self.date_part.width() {
                    self.commit_pending();
                    self.next_date_part();
                }
            }
            KeyCode::Backspace => {
                self.pending.pop();
            }
            KeyCode::Right | KeyCode::Char('.') => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    // Invalid values are dropped; a day past the month's end is clamped.
    fn commit_pending(&mut self) {
        let Ok(value) = self.pending.parse::<u32>() else {
            return;
        };

        let (mut year, mut month, mut day) = (self.date.year(), self.date.month(), self.date.day());
        match self.date_part {
            DatePart::Day => day = value,
            DatePart::Month => month = value,
            DatePart::Year => year = value as i32,
        }

        if !(1..=12).contains(&month) || !(1900..=2100).contains(&year) || day == 0 {
            return;
        }

        if self.date_part == DatePart::Day {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.date = date;
            }
            return;
        }

        let clamped = (1..=day)
            .rev()
            .find_map(|d| NaiveDate::from_ymd_opt(year, month, d));
        if let Some(date) = clamped {
            self.date = date;
        }
    }

    pub fn get_display_string(&self) -> String {
        let marker = if self.pending.is_empty() {
            match self.date_part {
                DatePart::Day => "[DD]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Year => "[YYYY]".to_string(),
            }
        } else {
            format!("[{}]", self.pending)
        };

        let day = format!("{:02}", self.date.day());
        let month = format!("{:02}", self.date.month());
        let year = self.date.year().to_string();

        match self.date_part {
            DatePart::Day => format!("{}{}.{}.{}", day, marker, month, year),
            DatePart::Month => format!("{}.{}{}.{}", day, month, marker, year),
            DatePart::Year => format!("{}.{}.{}{}", day, month, year, marker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_input(KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_all_parts_sets_date() {
        let mut state = DateInputState::new(ymd(2021, 12, 17));

        type_digits(&mut state, "15032024");

        assert_eq!(state.date, ymd(2024, 3, 15));
        assert_eq!(state.date_part, DatePart::Day);
    }

    #[test]
    fn invalid_month_is_ignored() {
        let mut state = DateInputState::new(ymd(2021, 12, 17));
        state.next_date_part();

        type_digits(&mut state, "13");

        assert_eq!(state.date, ymd(2021, 12, 17));
        assert_eq!(state.date_part, DatePart::Year);
    }

    #[test]
    fn day_is_clamped_when_month_shrinks() {
        let mut state = DateInputState::new(ymd(2024, 1, 31));
        state.next_date_part();

        type_digits(&mut state, "02");

        assert_eq!(state.date, ymd(2024, 2, 29));
    }

    #[test]
    fn impossible_day_is_ignored() {
        let mut state = DateInputState::new(ymd(2023, 2, 10));

        type_digits(&mut state, "30");

        assert_eq!(state.date, ymd(2023, 2, 10));
    }

    #[test]
    fn display_marks_active_part() {
        let mut state = DateInputState::new(ymd(2021, 12, 17));
        assert_eq!(state.get_display_string(), "17[DD].12.2021");

        state.handle_input(KeyCode::Right);
        state.handle_input(KeyCode::Char('0'));
        assert_eq!(state.get_display_string(), "17.12[0].2021");

        state.handle_input(KeyCode::Backspace);
        state.handle_input(KeyCode::Left);
        state.handle_input(KeyCode::Left);
        assert_eq!(state.get_display_string(), "17.12.2021[YYYY]");
    }
}
