pub mod bar;
pub mod indicators;
pub mod scale;
pub mod time_axis;
pub mod timeframe;
pub mod types;

pub use bar::{Bar, validate_bar_sequence};
pub use indicators::{IndicatorSet, dense_samples};
pub use scale::LinearScale;
pub use time_axis::{ChartMode, IntradayOffset, TimeAxisMap, TimeCoordinate};
pub use timeframe::{HistoricalPeriod, IntradayInterval, Timeframe};
pub use types::{ContainerSize, LogicalRange};
