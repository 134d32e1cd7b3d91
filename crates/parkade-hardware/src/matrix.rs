//! 4x3 matrix keypad scanner.
//!
//! Rows are outputs, columns are inputs with pull-ups. A scan selects one
//! row at a time by driving it low (all others high), lets the lines settle,
//! and reads the columns: a column pulled low means the key at that row and
//! column is down. The scanner then waits for the key to be released and
//! debounces before reporting it, so one physical press yields exactly one
//! key.
//!
//! ```text
//!          col0 col1 col2
//!   row0 [  1    2    3  ]
//!   row1 [  4    5    6  ]
//!   row2 [  7    8    9  ]
//!   row3 [  *    0    #  ]
//! ```

use std::time::Duration;

use parkade_core::{
    Key, Level,
    constants::{KEYPAD_DEBOUNCE_MS, KEYPAD_ROW_SETTLE_MS},
};
use tracing::debug;

use crate::{
    Result,
    traits::{Clock, DigitalInput, DigitalOutput, Keypad},
};

pub const ROWS: usize = 4;
pub const COLUMNS: usize = 3;

/// Key at each (row, column) position.
pub const KEYMAP: [[Key; COLUMNS]; ROWS] = [
    [Key::Digit(1), Key::Digit(2), Key::Digit(3)],
    [Key::Digit(4), Key::Digit(5), Key::Digit(6)],
    [Key::Digit(7), Key::Digit(8), Key::Digit(9)],
    [Key::Star, Key::Digit(0), Key::Hash],
];

/// Interval between column reads while waiting for a key release.
const RELEASE_POLL: Duration = Duration::from_millis(1);

/// Keypad driven through raw row and column pins.
#[derive(Debug)]
pub struct MatrixKeypad<R, C, K> {
    rows: [R; ROWS],
    columns: [C; COLUMNS],
    clock: K,
    settle: Duration,
    debounce: Duration,
}

impl<R, C, K> MatrixKeypad<R, C, K>
where
    R: DigitalOutput,
    C: DigitalInput,
    K: Clock,
{
    /// Create a scanner with the default settle and debounce times.
    pub fn new(rows: [R; ROWS], columns: [C; COLUMNS], clock: K) -> Self {
        Self {
            rows,
            columns,
            clock,
            settle: Duration::from_millis(KEYPAD_ROW_SETTLE_MS),
            debounce: Duration::from_millis(KEYPAD_DEBOUNCE_MS),
        }
    }

    /// Override the row settle time.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Override the release debounce time.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Drive `row` low and every other row high.
    async fn select_row(&mut self, row: usize) -> Result<()> {
        for (index, pin) in self.rows.iter_mut().enumerate() {
            pin.set(Level::from(index != row)).await?;
        }
        Ok(())
    }

    /// Drive every row high.
    async fn deselect_rows(&mut self) -> Result<()> {
        for pin in &mut self.rows {
            pin.set(Level::High).await?;
        }
        Ok(())
    }

    async fn wait_for_release(&mut self, column: usize) -> Result<()> {
        while self.columns[column].read().await?.is_low() {
            self.clock.wait_for(RELEASE_POLL).await;
        }
        self.clock.wait_for(self.debounce).await;
        Ok(())
    }
}

impl<R, C, K> Keypad for MatrixKeypad<R, C, K>
where
    R: DigitalOutput,
    C: DigitalInput,
    K: Clock,
{
    async fn scan(&mut self) -> Result<Option<Key>> {
        for row in 0..ROWS {
            self.select_row(row).await?;
            self.clock.wait_for(self.settle).await;

            for column in 0..COLUMNS {
                if self.columns[column].read().await?.is_low() {
                    self.wait_for_release(column).await?;
                    self.deselect_rows().await?;

                    let key = KEYMAP[row][column];
                    debug!(row, column, key = %key, "Key pressed");
                    return Ok(Some(key));
                }
            }
        }

        self.deselect_rows().await?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::VirtualClock;
    use std::sync::{Arc, Mutex};

    /// Electrical model of the matrix: a column reads low only while its
    /// pressed row is driven low.
    #[derive(Debug, Default)]
    struct Board {
        row_levels: [Option<Level>; ROWS],
        pressed: Option<(usize, usize)>,
        reads_until_release: usize,
    }

    struct RowPin(usize, Arc<Mutex<Board>>);
    struct ColumnPin(usize, Arc<Mutex<Board>>);

    impl DigitalOutput for RowPin {
        async fn set(&mut self, level: Level) -> Result<()> {
            self.1.lock().unwrap().row_levels[self.0] = Some(level);
            Ok(())
        }
    }

    impl DigitalInput for ColumnPin {
        async fn read(&mut self) -> Result<Level> {
            let mut board = self.1.lock().unwrap();
            let Some((row, column)) = board.pressed else {
                return Ok(Level::High);
            };
            if column != self.0 || board.row_levels[row] != Some(Level::Low) {
                return Ok(Level::High);
            }
            if board.reads_until_release == 0 {
                board.pressed = None;
                return Ok(Level::High);
            }
            board.reads_until_release -= 1;
            Ok(Level::Low)
        }
    }

    fn keypad(
        board: &Arc<Mutex<Board>>,
        clock: &VirtualClock,
    ) -> MatrixKeypad<RowPin, ColumnPin, VirtualClock> {
        let rows = [0, 1, 2, 3].map(|i| RowPin(i, Arc::clone(board)));
        let columns = [0, 1, 2].map(|i| ColumnPin(i, Arc::clone(board)));
        MatrixKeypad::new(rows, columns, clock.clone())
    }

    fn press(board: &Arc<Mutex<Board>>, row: usize, column: usize, held_reads: usize) {
        let mut board = board.lock().unwrap();
        board.pressed = Some((row, column));
        board.reads_until_release = held_reads;
    }

    #[tokio::test]
    async fn test_no_key_scans_every_row() {
        let board = Arc::new(Mutex::new(Board::default()));
        let clock = VirtualClock::new();
        let mut keypad = keypad(&board, &clock);

        assert_eq!(keypad.scan().await.unwrap(), None);

        // One settle wait per row, and every row released afterwards.
        assert_eq!(clock.elapsed(), Duration::from_millis(2 * ROWS as u64));
        let board = board.lock().unwrap();
        assert!(board.row_levels.iter().all(|l| *l == Some(Level::High)));
    }

    #[tokio::test]
    async fn test_zero_key_on_bottom_row() {
        let board = Arc::new(Mutex::new(Board::default()));
        let clock = VirtualClock::new();
        let mut keypad = keypad(&board, &clock);

        press(&board, 3, 1, 3);

        assert_eq!(keypad.scan().await.unwrap(), Some(Key::Digit(0)));
        assert_eq!(keypad.scan().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_press_waits_for_release_then_debounces() {
        let board = Arc::new(Mutex::new(Board::default()));
        let clock = VirtualClock::new();
        let mut keypad = keypad(&board, &clock);

        press(&board, 0, 2, 4);

        assert_eq!(keypad.scan().await.unwrap(), Some(Key::Digit(3)));

        let waits = clock.waits();
        // settle, then three release polls, then the debounce.
        assert_eq!(waits.first(), Some(&Duration::from_millis(2)));
        assert_eq!(
            waits.iter().filter(|w| **w == RELEASE_POLL).count(),
            3
        );
        assert_eq!(waits.last(), Some(&Duration::from_millis(10)));
    }

    #[test]
    fn test_keymap_covers_twelve_symbols() {
        let symbols: String = KEYMAP.iter().flatten().map(|k| k.as_char()).collect();
        assert_eq!(symbols, "123456789*0#");
    }
}
