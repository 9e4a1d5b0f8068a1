use std::path::Path;

use crate::analysis::background::{subtract_line, LineEquation, LineFit};
use crate::analysis::integrate::trapezoid;
use crate::config::AnalyzerConfig;
use crate::data::export;
use crate::data::loader::{aggregate, list_folder, AggregationReport};
use crate::data::model::{PickedPoint, Spectrum};
use crate::data::slice::slice_between;
use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// SpectrumStore – current spectrum + click history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SpectrumStore {
    spectrum: Spectrum,
    points: Vec<PickedPoint>,
}

impl SpectrumStore {
    pub fn spectrum(&self) -> &Spectrum {
        &self.spectrum
    }

    pub fn spectrum_mut(&mut self) -> &mut Spectrum {
        &mut self.spectrum
    }

    /// Overwrite the spectrum wholesale.
    pub fn replace(&mut self, spectrum: Spectrum) {
        self.spectrum = spectrum;
    }

    /// Drop the spectrum. The click history is kept.
    pub fn clear(&mut self) {
        self.spectrum = Spectrum::default();
    }

    pub fn record_point(&mut self, point: PickedPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[PickedPoint] {
        &self.points
    }

    /// The two most recent clicks, older one first.
    pub fn last_two_points(&self) -> AnalysisResult<(PickedPoint, PickedPoint)> {
        match self.points.as_slice() {
            [.., p1, p2] => Ok((*p1, *p2)),
            _ => Err(AnalysisError::InsufficientPoints),
        }
    }
}

// ---------------------------------------------------------------------------
// Two-phase trigger: first press asks for points, second press runs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerState {
    /// Next press shows guidance.
    #[default]
    Ready,
    /// Next press runs the operation.
    Armed,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TwoPhaseTrigger {
    state: TriggerState,
}

impl TwoPhaseTrigger {
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Flip the trigger and return the state it was in before the press.
    pub fn press(&mut self) -> TriggerState {
        let previous = self.state;
        self.state = match previous {
            TriggerState::Ready => TriggerState::Armed,
            TriggerState::Armed => TriggerState::Ready,
        };
        previous
    }
}

// ---------------------------------------------------------------------------
// Session – everything one user works on
// ---------------------------------------------------------------------------

const HELP_TEXT: &str = "\
This application takes in data collected from electron spectroscopy.
In spectroscopy material is exposed to a bright light. This causes electrons
to detach; measuring the kinetic energy of the detached electrons tells us
more about the material's properties.
After importing the data (\"open\") the application can display it (\"plot\"),
calculate the integral between two points (\"integrate\"):
    integrate -> click two points -> integrate again
and remove a linear background (\"background\"):
    background -> click two points -> background again
The line fitted through the two clicks is subtracted from the data.
You can also clear the data and save the spectrum as a CSV file (\"save\").";

/// The full analysis state, independent of any front end.
///
/// Every user action is a method. Failures never escape: they are turned into
/// status lines, which the front end collects with [`Session::take_messages`].
#[derive(Debug, Default)]
pub struct Session {
    config: AnalyzerConfig,
    store: SpectrumStore,
    integrate_trigger: TwoPhaseTrigger,
    background_trigger: TwoPhaseTrigger,
    last_report: Option<AggregationReport>,
    messages: Vec<String>,
}

impl Session {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn store(&self) -> &SpectrumStore {
        &self.store
    }

    pub fn spectrum(&self) -> &Spectrum {
        self.store.spectrum()
    }

    pub fn last_report(&self) -> Option<&AggregationReport> {
        self.last_report.as_ref()
    }

    /// Drain the status lines produced since the last call.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    fn say(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    fn report_error(&mut self, err: &AnalysisError) {
        log::warn!("{err}");
        self.say(err.to_string());
    }

    // -- import --

    /// Import every measurement file in `folder`. Returns the number of
    /// accepted files, or `None` when the folder could not be listed (the
    /// current spectrum is then left untouched).
    pub fn open_folder(&mut self, folder: &Path) -> Option<usize> {
        match list_folder(folder) {
            Ok(names) => Some(self.import_files(&names, folder)),
            Err(err) => {
                self.report_error(&err);
                None
            }
        }
    }

    /// Import the given files from `folder`, replacing the current spectrum.
    pub fn import_files<S: AsRef<str>>(&mut self, file_names: &[S], folder: &Path) -> usize {
        let report = aggregate(file_names, folder, &self.config.extension);
        for problem in report.problems() {
            self.say(problem.to_string());
        }

        let accepted = report.accepted_files.len();
        let spectrum = report.measurements.to_spectrum(self.config.sort_by_energy);
        log::info!("Imported {accepted} files, spectrum has {} points", spectrum.len());
        self.store.replace(spectrum);
        self.last_report = Some(report);
        self.say(format!("Found {accepted} files with viable data."));
        accepted
    }

    // -- interaction --

    /// Record a click. Non-finite coordinates are reported and not recorded.
    pub fn pick_point(&mut self, x: f64, y: f64) -> bool {
        if !(x.is_finite() && y.is_finite()) {
            self.report_error(&AnalysisError::InvalidPoint { x, y });
            return false;
        }
        let point = PickedPoint::new(x, y);
        self.store.record_point(point);
        self.say(format!("Data at mouse click was {point}"));
        true
    }

    /// Points to draw. Warns when there is nothing to show.
    pub fn plot_points(&mut self) -> Vec<[f64; 2]> {
        if self.store.spectrum().is_empty() {
            self.say("No data has been given. Unable to plot the data");
        }
        self.store.spectrum().points()
    }

    /// Reset the spectrum. Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.store.clear();
        log::info!("Cleared spectrum");
        self.say("App data and plot was cleared");
    }

    pub fn help(&mut self) {
        self.say(HELP_TEXT);
    }

    pub fn save_csv(&mut self, path: &Path) -> bool {
        match export::write_csv(self.store.spectrum(), path) {
            Ok(()) => {
                self.say(format!("Spectrum saved to {}", path.display()));
                true
            }
            Err(e) => {
                log::error!("Failed to save spectrum: {e:#}");
                self.say(format!("Unable to save spectrum: {e:#}"));
                false
            }
        }
    }

    // -- gated operations --

    /// First call asks for two clicks; the next call integrates between the
    /// last two clicks.
    pub fn integrate(&mut self) -> Option<f64> {
        match self.integrate_trigger.press() {
            TriggerState::Ready => {
                self.say("Now click two datapoints on the graph and click integrate again");
                self.say("Or use the last two datapoints by double-clicking integrate");
                None
            }
            TriggerState::Armed => match self.integrate_last_two() {
                Ok(area) => {
                    log::info!("Integral = {area}");
                    self.say(format!("The integral between selected points is {area}"));
                    Some(area)
                }
                Err(err) => {
                    self.report_error(&err);
                    None
                }
            },
        }
    }

    fn integrate_last_two(&self) -> AnalysisResult<f64> {
        let (p1, p2) = self.store.last_two_points()?;
        let cut = slice_between(self.store.spectrum(), p1.x, p2.x)?;
        trapezoid(cut.x, cut.y)
    }

    /// First call asks for two clicks; the next call fits a line through the
    /// last two clicks and subtracts it from the spectrum.
    pub fn remove_background(&mut self) -> Option<LineEquation> {
        match self.background_trigger.press() {
            TriggerState::Ready => {
                self.say("Now click two datapoints on the graph and click 'remove background' again");
                self.say("Or use the last two datapoints by double-clicking 'remove background'");
                None
            }
            TriggerState::Armed => match self.subtract_last_two() {
                Ok(line) => {
                    let n = self.store.spectrum().len();
                    log::info!("Removed background {line} from {n} points");
                    self.say(format!("The equation is: {line}"));
                    self.say(format!("Background removed from {n} points"));
                    Some(line)
                }
                Err(err) => {
                    self.report_error(&err);
                    None
                }
            },
        }
    }

    fn subtract_last_two(&mut self) -> AnalysisResult<LineEquation> {
        let (p1, p2) = self.store.last_two_points()?;
        let line = LineFit::through(p1, p2).into_result()?;
        subtract_line(self.store.spectrum_mut(), &line)?;
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(points: &[(f64, f64)]) -> Session {
        let mut session = Session::default();
        session.store.replace(Spectrum::from_points(points.iter().copied()));
        session
    }

    #[test]
    fn last_two_points_are_chronological() {
        let mut store = SpectrumStore::default();
        assert_eq!(store.last_two_points(), Err(AnalysisError::InsufficientPoints));
        store.record_point(PickedPoint::new(1.0, 1.0));
        assert_eq!(store.last_two_points(), Err(AnalysisError::InsufficientPoints));
        store.record_point(PickedPoint::new(2.0, 2.0));
        store.record_point(PickedPoint::new(3.0, 3.0));

        let (p1, p2) = store.last_two_points().unwrap();
        assert_eq!(p1, PickedPoint::new(2.0, 2.0));
        assert_eq!(p2, PickedPoint::new(3.0, 3.0));
    }

    #[test]
    fn clear_twice_is_fine_and_keeps_clicks() {
        let mut session = session_with(&[(1.0, 1.0)]);
        session.pick_point(1.0, 1.0);
        session.clear();
        session.clear();
        assert!(session.spectrum().is_empty());
        assert_eq!(session.store().points().len(), 1);
    }

    #[test]
    fn trigger_alternates() {
        let mut trigger = TwoPhaseTrigger::default();
        assert_eq!(trigger.press(), TriggerState::Ready);
        assert_eq!(trigger.state(), TriggerState::Armed);
        assert_eq!(trigger.press(), TriggerState::Armed);
        assert_eq!(trigger.press(), TriggerState::Ready);
    }

    #[test]
    fn first_integrate_only_guides() {
        let mut session = session_with(&[(0.0, 0.0), (1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
        session.pick_point(0.0, 0.0);
        session.pick_point(3.0, 6.0);
        session.take_messages();

        assert_eq!(session.integrate(), None);
        let msgs = session.take_messages();
        assert!(msgs[0].starts_with("Now click two datapoints"), "{msgs:?}");

        assert_eq!(session.integrate(), Some(4.0));
        let msgs = session.take_messages();
        assert_eq!(msgs, vec!["The integral between selected points is 4"]);
    }

    #[test]
    fn failed_execution_still_flips_the_trigger() {
        let mut session = session_with(&[(0.0, 0.0), (1.0, 1.0)]);
        session.integrate();
        session.take_messages();

        assert_eq!(session.integrate(), None);
        assert_eq!(
            session.take_messages(),
            vec![AnalysisError::InsufficientPoints.to_string()]
        );

        // back to guidance
        assert_eq!(session.integrate(), None);
        assert!(session.take_messages()[0].starts_with("Now click"));
    }

    #[test]
    fn triggers_are_independent() {
        let mut session = session_with(&[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0)]);
        session.integrate();
        // background still starts with guidance even though integrate is armed
        assert_eq!(session.remove_background(), None);
        session.take_messages();

        session.pick_point(1.0, 2.0);
        session.pick_point(3.0, 2.0);
        let line = session.remove_background().unwrap();
        assert_eq!(line.slope, 0.0);
        assert_eq!(line.intercept, 2.0);
        assert_eq!(session.spectrum().y(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn vertical_line_leaves_spectrum_alone() {
        let mut session = session_with(&[(1.0, 5.0), (2.0, 6.0)]);
        session.pick_point(2.0, 3.0);
        session.pick_point(2.0, 5.0);
        session.remove_background();
        session.take_messages();

        assert_eq!(session.remove_background(), None);
        assert_eq!(
            session.take_messages(),
            vec![AnalysisError::VerticalLine.to_string()]
        );
        assert_eq!(session.spectrum().y(), &[5.0, 6.0]);
    }

    #[test]
    fn non_finite_clicks_are_not_recorded() {
        let mut session = session_with(&[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0)]);
        session.remove_background();
        assert!(session.pick_point(1.0, 2.0));
        assert!(!session.pick_point(f64::INFINITY, 2.0));
        assert!(!session.pick_point(0.0, f64::NAN));
        assert_eq!(session.store().points().len(), 1);
        session.take_messages();

        assert_eq!(session.remove_background(), None);
        assert_eq!(
            session.take_messages(),
            vec![AnalysisError::InsufficientPoints.to_string()]
        );
        assert_eq!(session.spectrum().y(), &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn overflowing_line_leaves_spectrum_alone() {
        let mut session = session_with(&[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0)]);
        session.remove_background();
        session.pick_point(1e308, 1e308);
        session.pick_point(-1e308, 2.0);
        session.take_messages();

        assert_eq!(session.remove_background(), None);
        assert_eq!(
            session.take_messages(),
            vec![AnalysisError::UndefinedLine.to_string()]
        );
        assert!(session.spectrum().y().iter().all(|y| y.is_finite()));
        assert_eq!(session.spectrum().y(), &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn stale_clicks_after_clear_report_empty_spectrum() {
        let mut session = session_with(&[(1.0, 5.0), (2.0, 6.0), (3.0, 7.0)]);
        session.pick_point(1.0, 0.0);
        session.pick_point(3.0, 0.0);
        session.clear();
        session.integrate();
        session.take_messages();

        assert_eq!(session.integrate(), None);
        assert_eq!(
            session.take_messages(),
            vec![AnalysisError::EmptySpectrum.to_string()]
        );
    }

    #[test]
    fn plotting_nothing_warns() {
        let mut session = Session::default();
        assert!(session.plot_points().is_empty());
        assert_eq!(
            session.take_messages(),
            vec!["No data has been given. Unable to plot the data"]
        );
    }
}
