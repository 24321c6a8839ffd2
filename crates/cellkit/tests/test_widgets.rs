//! Integration tests for several widgets sharing one screen.

#[cfg(test)]
mod tests {
    use cellkit::{
        Error, Outcome, Result, Widget,
        config::Options,
        event::{Key, keys},
        testing::Harness,
        widgets::{
            AlphaList, AlphaListConfig, Entry, EntryConfig, ItemListConfig, Label, LabelConfig,
            Matrix, MatrixConfig,
        },
    };
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn opts(v: Value) -> Options {
        match v {
            Value::Object(m) => m,
            _ => Options::new(),
        }
    }

    fn typed(s: &str) -> Vec<Key> {
        s.chars().map(Key::from).collect()
    }

    #[test]
    fn paste_buffer_is_shared_across_widgets() -> Result<()> {
        let mut h = Harness::new(60, 20);
        let mut e = Entry::new(
            &mut h.screen,
            EntryConfig::from_options(&opts(json!({"field_width": 8, "x": 0, "y": 0})))?,
        )?;
        let mut m = Matrix::new(
            &mut h.screen,
            MatrixConfig::from_options(&opts(json!({"rows": 2, "cols": 2, "x": 30, "y": 0})))?,
        )?;

        let mut script = typed("abc");
        script.push(keys::COPY);
        e.activate(&mut h.screen, Some(&script))?;
        m.activate(&mut h.screen, Some(&[keys::PASTE]))?;
        assert_eq!(m.get_cell(1, 1), Some("abc"));

        assert!(m.set_cell(2, 2, "xy"));
        assert!(m.move_to_cell(2, 2));
        m.activate(&mut h.screen, Some(&[keys::CUT]))?;
        e.activate(&mut h.screen, Some(&[keys::ERASE, keys::PASTE]))?;
        assert_eq!(e.text(), "xy");
        assert_eq!(m.get_cell(2, 2), Some(""));
        Ok(())
    }

    #[test]
    fn alphalist_selects_by_prefix() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let mut a = AlphaList::new(
            &mut h.screen,
            AlphaListConfig::from_options(&opts(json!({
                "width": 20, "height": 10, "label": "Fruit: ",
                "items": ["apple", "banana", "blueberry", "cherry"],
            })))?,
        )?;
        let mut script = typed("bl");
        script.push(keys::RETURN);
        assert_eq!(
            a.activate(&mut h.screen, Some(&script))?,
            Outcome::Confirmed("blueberry".to_string())
        );

        let mut script = typed("q");
        script.push(keys::RETURN);
        a.activate(&mut h.screen, Some(&script))?;
        assert_eq!(a.entry().text(), "bl");
        assert_eq!(h.canvas().beeps(), 1);
        Ok(())
    }

    #[test]
    fn registry_tracks_lifetimes() -> Result<()> {
        let mut h = Harness::new(40, 20);
        let l = Label::new(
            &mut h.screen,
            LabelConfig::from_options(&opts(json!({"message": ["one", "two"]})))?,
        )?;
        let a = AlphaList::new(
            &mut h.screen,
            AlphaListConfig::from_options(&opts(json!({
                "width": 20, "height": 8, "items": ["a", "b"], "x": 0, "y": 0,
            })))?,
        )?;
        let kinds: Vec<&str> = h.screen.widgets().map(|(_, k)| k).collect();
        assert_eq!(kinds.len(), 4);
        assert!(kinds.contains(&"label"));
        assert!(kinds.contains(&"alphalist"));

        a.destroy(&mut h.screen)?;
        assert_eq!(h.screen.widgets().count(), 1);
        l.destroy(&mut h.screen)?;
        assert_eq!(h.screen.widgets().count(), 0);
        assert!(h.canvas().regions.is_empty());
        Ok(())
    }

    #[test]
    fn erase_all_clears_every_widget() -> Result<()> {
        let mut h = Harness::new(40, 12);
        let mut l = Label::new(
            &mut h.screen,
            LabelConfig::from_options(&opts(json!({"message": "hello", "x": 0, "y": 0})))?,
        )?;
        let mut e = Entry::new(
            &mut h.screen,
            EntryConfig::from_options(&opts(json!({"field_width": 6, "value": "world", "x": 20, "y": 0})))?,
        )?;
        l.draw(&mut h.screen)?;
        e.draw(&mut h.screen)?;
        assert!(h.canvas().contains("hello"));
        assert!(h.canvas().contains("world"));

        h.screen.erase_all()?;
        let text = h.canvas().text();
        assert!(text.iter().all(|row| row.trim().is_empty()));
        Ok(())
    }

    #[test]
    fn every_schema_places_and_validates() {
        let names: Vec<Vec<&str>> = vec![
            LabelConfig::schema().names().collect(),
            EntryConfig::schema().names().collect(),
            ItemListConfig::schema().names().collect(),
            AlphaListConfig::schema().names().collect(),
            MatrixConfig::schema().names().collect(),
        ];
        for n in &names {
            assert_eq!(&n[..2], &["x", "y"]);
        }

        let bogus = opts(json!({"bogus": 1}));
        assert!(matches!(LabelConfig::from_options(&bogus), Err(Error::Config(_))));
        assert!(matches!(EntryConfig::from_options(&bogus), Err(Error::Config(_))));
        assert!(matches!(ItemListConfig::from_options(&bogus), Err(Error::Config(_))));
        assert!(matches!(AlphaListConfig::from_options(&bogus), Err(Error::Config(_))));
        assert!(matches!(MatrixConfig::from_options(&bogus), Err(Error::Config(_))));
    }
}
