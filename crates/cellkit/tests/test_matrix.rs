//! Integration tests for grid navigation and selective redraw.

#[cfg(test)]
mod tests {
    use cellkit::{
        Result, Widget,
        config::Options,
        event::{Key, KeyCode, keys},
        testing::Harness,
        widgets::{Matrix, MatrixConfig},
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn matrix(h: &mut Harness, opts: Value) -> Result<Matrix> {
        let opts = match opts {
            Value::Object(m) => m,
            _ => Options::new(),
        };
        Matrix::new(&mut h.screen, MatrixConfig::from_options(&opts)?)
    }

    /// A 6x6 grid with a 2x2 viewport and titles on both axes.
    fn titled(h: &mut Harness) -> Result<Matrix> {
        let rows: Vec<String> = (1..=6).map(|i| format!("r{i}")).collect();
        let cols: Vec<String> = (1..=6).map(|i| format!("c{i}")).collect();
        matrix(
            h,
            json!({
                "rows": 6, "cols": 6, "vrows": 2, "vcols": 2, "col_widths": 3,
                "row_titles": rows, "col_titles": cols,
            }),
        )
    }

    #[test]
    fn out_of_range_moves_are_rejected() -> Result<()> {
        for (vrows, vcols) in [(1, 1), (3, 4), (10, 10)] {
            let mut h = Harness::new(80, 40);
            let mut m = matrix(
                &mut h,
                json!({"rows": 10, "cols": 10, "vrows": vrows, "vcols": vcols, "col_widths": 2}),
            )?;
            assert!(m.move_to_cell(4, 4));
            let before = (m.current(), m.anchor(), m.viewport_cursor());
            assert!(!m.move_to_cell(0, 5));
            assert!(!m.move_to_cell(11, 5));
            assert!(!m.move_to_cell(5, 0));
            assert!(!m.move_to_cell(5, 11));
            assert_eq!((m.current(), m.anchor(), m.viewport_cursor()), before);
        }
        Ok(())
    }

    #[test]
    fn moves_scroll_minimally() -> Result<()> {
        let mut h = Harness::new(80, 40);
        let mut m = matrix(
            &mut h,
            json!({"rows": 10, "cols": 10, "vrows": 3, "vcols": 3, "col_widths": 2}),
        )?;
        assert!(m.move_to_cell(5, 2));
        assert_eq!(m.anchor(), (3, 1));
        assert_eq!(m.viewport_cursor(), (3, 2));
        assert!(m.move_to_cell(4, 10));
        assert_eq!(m.anchor(), (3, 8));
        assert_eq!(m.viewport_cursor(), (2, 3));
        assert!(m.move_to_cell(10, 1));
        assert_eq!(m.anchor(), (8, 1));
        assert!(m.move_to_cell(1, 1));
        assert_eq!(m.anchor(), (1, 1));
        Ok(())
    }

    #[test]
    fn full_viewports_never_scroll() -> Result<()> {
        let mut h = Harness::new(80, 40);
        let mut m = matrix(&mut h, json!({"rows": 4, "cols": 3, "col_widths": 2}))?;
        assert!(m.move_to_cell(4, 3));
        assert_eq!(m.anchor(), (1, 1));
        assert_eq!(m.viewport_cursor(), (4, 3));
        Ok(())
    }

    #[test]
    fn moves_inside_the_viewport_redraw_two_cells() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = titled(&mut h)?;
        m.draw(&mut h.screen)?;
        h.canvas().take_log();

        m.inject(&mut h.screen, Key::from(KeyCode::Right))?;
        let c = h.canvas();
        assert_eq!(c.blits_to(m.col_title_region().unwrap()), 0);
        assert_eq!(c.blits_to(m.row_title_region().unwrap()), 0);
        assert!(c.blits_to(m.cell_region(1, 1).unwrap()) > 0);
        assert!(c.blits_to(m.cell_region(1, 2).unwrap()) > 0);
        assert_eq!(c.blits_to(m.cell_region(2, 1).unwrap()), 0);
        assert_eq!(c.blits_to(m.cell_region(2, 2).unwrap()), 0);
        Ok(())
    }

    #[test]
    fn horizontal_scrolling_redraws_only_column_titles() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = titled(&mut h)?;
        m.draw(&mut h.screen)?;
        m.inject(&mut h.screen, Key::from(KeyCode::Right))?;
        h.canvas().take_log();

        m.inject(&mut h.screen, Key::from(KeyCode::Right))?;
        assert_eq!(m.anchor(), (1, 2));
        let c = h.canvas();
        assert!(c.blits_to(m.col_title_region().unwrap()) > 0);
        assert_eq!(c.blits_to(m.row_title_region().unwrap()), 0);
        assert!(c.blits_to(m.cell_region(2, 2).unwrap()) > 0);
        assert!(c.contains("c2"));
        assert!(c.contains("c3"));
        assert!(!c.contains("c1"));
        Ok(())
    }

    #[test]
    fn vertical_scrolling_redraws_only_row_titles() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = titled(&mut h)?;
        m.draw(&mut h.screen)?;
        m.inject(&mut h.screen, Key::from(KeyCode::Down))?;
        h.canvas().take_log();

        m.inject(&mut h.screen, Key::from(KeyCode::Down))?;
        assert_eq!(m.anchor(), (2, 1));
        let c = h.canvas();
        assert!(c.blits_to(m.row_title_region().unwrap()) > 0);
        assert_eq!(c.blits_to(m.col_title_region().unwrap()), 0);
        assert!(c.contains("r3"));
        assert!(!c.contains("r1"));
        Ok(())
    }

    #[test]
    fn jump_prompts_for_missing_coordinates() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = titled(&mut h)?;
        m.draw(&mut h.screen)?;
        h.script
            .push([Key::from('5'), keys::RETURN, Key::from('4'), keys::RETURN]);
        m.inject(&mut h.screen, keys::JUMP)?;
        assert_eq!(m.current(), (5, 4));
        assert_eq!(m.anchor(), (4, 3));
        assert_eq!(h.screen.widgets().count(), 1);
        assert!(h.script.remaining().is_empty());

        h.script.push([keys::CANCEL]);
        m.inject(&mut h.screen, keys::JUMP)?;
        assert_eq!(m.current(), (5, 4));
        assert_eq!(h.canvas().beeps(), 1);
        assert_eq!(h.screen.widgets().count(), 1);
        Ok(())
    }

    #[test]
    fn out_of_range_jump_is_a_notice() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut m = titled(&mut h)?;
        h.script
            .push([Key::from('9'), keys::RETURN, Key::from('1'), keys::RETURN]);
        m.inject(&mut h.screen, keys::JUMP)?;
        assert_eq!(m.current(), (1, 1));
        assert_eq!(h.canvas().beeps(), 1);
        Ok(())
    }
}
