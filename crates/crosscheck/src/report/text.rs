//! Plain-text tables for terminal output

use std::fmt::{self, Display, Formatter};

use crosscheck_core::analysis::{ScenarioGrid, SensitivityTable, SobolReport, TornadoChart};

use super::{EvaluationReport, FullReport, MonteCarloSummary};
use crate::util::format::{bar, format_conf, format_hours, format_index, format_percentage};

const BAR_WIDTH: usize = 30;

fn heading(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "=".repeat(title.chars().count()))
}

pub struct EvaluationView<'a>(pub &'a EvaluationReport);

impl Display for EvaluationView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let EvaluationReport {
            scenario,
            parameters: p,
            outputs: o,
        } = self.0;
        heading(f, &format!("Scenario: {scenario}"))?;
        writeln!(
            f,
            "  a1 {:.4}  a2 {:.4}  a3 {:.4}  b0 {:.4}",
            p.a1, p.a2, p.a3, p.b0
        )?;
        writeln!(
            f,
            "  quality {}  schedule {}",
            p.quality_grade.label(),
            p.schedule_grade.label()
        )?;
        writeln!(
            f,
            "  cross-check {}  prep/post {}  loss unit {:.4}",
            format_percentage(p.cross_check_ratio),
            format_percentage(p.prep_post_ratio),
            p.loss_unit
        )?;
        writeln!(f, "  tasks {:.2}h / {:.2}h / {:.2}h", p.t1, p.t2, p.t3)?;
        writeln!(f)?;
        writeln!(f, "  {:<28}{:>14}", "Steps succeed (a_total)", format_percentage(o.a_total))?;
        writeln!(f, "  {:<28}{:>14}", "Checker catches (b_eff)", format_percentage(o.b_effective))?;
        writeln!(f, "  {:<28}{:>14}", "Success rate S", format_percentage(o.success_rate))?;
        writeln!(f, "  {:<28}{:>14}", "Task time T", format_hours(o.task_time))?;
        writeln!(f, "  {:<28}{:>14}", "Labor cost C", format_hours(o.labor_cost))?;
        writeln!(f, "  {:<28}{:>14}", "Loss-adjusted cost", format_hours(o.loss_adjusted_cost))?;
        writeln!(f, "  {:<28}{:>14}", "Efficiency E = C/S", format_hours(o.efficiency))?;
        writeln!(f, "  {:<28}{:>14}", "Total efficiency E_total", format_hours(o.total_efficiency))
    }
}

pub struct TornadoView<'a>(pub &'a TornadoChart);

impl Display for TornadoView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let chart = self.0;
        heading(f, "Tornado sensitivity of E_total")?;
        writeln!(f, "  baseline E_total {}", format_hours(chart.baseline_total_efficiency))?;
        let max = chart
            .bars
            .iter()
            .map(|b| b.impact)
            .filter(|x| x.is_finite())
            .fold(0.0, f64::max);
        writeln!(
            f,
            "  {:<18}{:>10}{:>10}{:>12}{:>12}{:>10}",
            "input", "low", "high", "E(low)", "E(high)", "impact"
        )?;
        for b in &chart.bars {
            writeln!(
                f,
                "  {:<18}{:>10.4}{:>10.4}{:>12.4}{:>12.4}{:>10}  {}",
                b.factor.label(),
                b.low,
                b.high,
                b.e_low,
                b.e_high,
                format_index(b.impact),
                bar(b.impact, max, BAR_WIDTH)
            )?;
        }
        Ok(())
    }
}

pub struct SensitivityView<'a>(pub &'a SensitivityTable);

impl Display for SensitivityView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let table = self.0;
        heading(f, "Elasticity and standardized sensitivity")?;
        writeln!(f, "  E_total {}", format_hours(table.total_efficiency))?;
        writeln!(
            f,
            "  {:<14}{:>12}{:>14}{:>12}{:>12}{:>14}",
            "input", "value", "dE/dx", "|slope|", "elasticity", "standardized"
        )?;
        for row in table.ranked_by_elasticity() {
            let standardized = row
                .standardized
                .map_or_else(|| "-".to_string(), format_index);
            writeln!(
                f,
                "  {:<14}{:>12.4}{:>14.4}{:>12.4}{:>12}{:>14}",
                row.input.label(),
                row.value,
                row.derivative,
                row.slope,
                format_index(row.elasticity),
                standardized
            )?;
        }
        Ok(())
    }
}

pub struct MonteCarloView<'a>(pub &'a MonteCarloSummary);

impl Display for MonteCarloView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mc = self.0;
        heading(
            f,
            &format!(
                "Monte Carlo: {} ({} samples, seed {})",
                mc.output.label(),
                mc.num_samples,
                mc.seed
            ),
        )?;
        let s = &mc.stats;
        writeln!(f, "  mean {:.4}  median {:.4}  std {:.4}", s.mean, s.median, s.std_dev)?;
        writeln!(f, "  p5 {:.4}  p95 {:.4}", s.p5, s.p95)?;
        writeln!(f, "  min {:.4}  max {:.4}", s.min, s.max)?;
        writeln!(f)?;

        let max = mc.histogram.counts.iter().copied().max().unwrap_or(0);
        for (edge, count) in mc.histogram.edges.windows(2).zip(&mc.histogram.counts) {
            writeln!(
                f,
                "  {:>10.4} .. {:<10.4}{:>8}  {}",
                edge[0],
                edge[1],
                count,
                bar(*count as f64, max as f64, BAR_WIDTH)
            )?;
        }
        Ok(())
    }
}

pub struct SobolView<'a>(pub &'a SobolReport);

impl Display for SobolView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;
        heading(f, "Sobol indices of E_total")?;
        write!(
            f,
            "  {} base samples, {} evaluations",
            report.base_samples, report.evaluations
        )?;
        if report.was_rounded() {
            write!(f, " (rounded up from {})", report.requested_samples)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "  {:<18}{:>20}{:>10}{:>10}{:>10}{:>10}",
            "input", "range", "S1", "±", "ST", "±"
        )?;
        for row in &report.rows {
            let range = format!("{:.3} .. {:.3}", row.lower, row.upper);
            writeln!(
                f,
                "  {:<18}{:>20}{:>10}{:>10}{:>10}{:>10}{}",
                row.parameter.name(),
                range,
                format_index(row.first_order),
                format_conf(row.first_order_conf),
                format_index(row.total_order),
                format_conf(row.total_order_conf),
                if row.held_fixed { "  (fixed)" } else { "" }
            )?;
        }
        Ok(())
    }
}

pub struct GridView<'a>(pub &'a ScenarioGrid);

impl Display for GridView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let grid = self.0;
        heading(f, "Quality × schedule")?;
        writeln!(
            f,
            "  {:<10}{:<10}{:>12}{:>14}{:>14}",
            "quality", "schedule", "S", "C", "E_total"
        )?;
        let cheapest = grid.cheapest();
        for cell in &grid.cells {
            let marker = if cheapest == Some(cell) { "  <- cheapest" } else { "" };
            writeln!(
                f,
                "  {:<10}{:<10}{:>12}{:>14}{:>14}{}",
                cell.quality.label(),
                cell.schedule.label(),
                format_percentage(cell.outputs.success_rate),
                format_hours(cell.outputs.labor_cost),
                format_hours(cell.outputs.total_efficiency),
                marker
            )?;
        }
        Ok(())
    }
}

pub struct ReportView<'a>(pub &'a FullReport);

impl Display for ReportView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(f, "{}", EvaluationView(&report.evaluation))?;
        writeln!(f, "{}", GridView(&report.scenarios))?;
        writeln!(f, "{}", TornadoView(&report.tornado))?;
        writeln!(f, "{}", SensitivityView(&report.sensitivity))?;
        writeln!(f, "{}", MonteCarloView(&report.monte_carlo))?;
        write!(f, "{}", SobolView(&report.global))
    }
}
