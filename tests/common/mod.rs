#![allow(dead_code)]

use gbsgrid::ResValue;

pub fn event(command: &str, id: &str) -> String {
    format!(r#"{{"command":"{command}","args":{{"note":"{id}"}},"id":"{id}"}}"#)
}

pub fn marker(id: &str) -> String {
    format!(r#"{{"command":"EVENT_INC_VALUE","args":{{"variable":"V1","__collapse":true}},"id":"{id}"}}"#)
}

/// Build a resource with ten columns of `rows` flag events each.
/// `branches(col, row)` returns the JSON events of the true and false branches.
pub fn document(rows: usize, branches: impl Fn(usize, usize) -> (Vec<String>, Vec<String>)) -> ResValue {
    let mut columns = Vec::new();
    for c in 0..10 {
        let mut flags = Vec::new();
        for r in 0..rows {
            let (t, f) = branches(c, r);
            flags.push(format!(
                r#"{{"command":"EVENT_IF_FLAGS_ALL","args":{{"variable":"T{c}"}},"children":{{"true":[{}],"false":[{}]}},"id":"flag_{c}_{r}"}}"#,
                t.join(","),
                f.join(",")
            ));
        }
        columns.push(format!(
            r#"{{"command":"EVENT_GROUP","args":{{"__label":"Column {c}"}},"children":{{"true":[{}]}},"id":"col_{c}"}}"#,
            flags.join(",")
        ));
    }
    let text = format!(
        r#"{{"name":"win_picross","script":[{{"command":"EVENT_GROUP","children":{{"true":[{},{{"command":"EVENT_GROUP","children":{{"true":[{}]}},"id":"flags"}}]}},"id":"root"}}]}}"#,
        event("EVENT_SET_VALUE", "reset"),
        columns.join(",")
    );
    ResValue::parse(&text).expect("test document parses")
}

/// Every cell has one marker, in the true branch when `on(col, row)`.
pub fn document_with(rows: usize, on: impl Fn(usize, usize) -> bool) -> ResValue {
    document(rows, |c, r| {
        let m = marker(&format!("m_{c}_{r}"));
        if on(c, r) { (vec![m], vec![]) } else { (vec![], vec![m]) }
    })
}

pub fn flag_event(doc: &ResValue, col: usize, row: usize) -> &ResValue {
    let columns = doc
        .get("script")
        .and_then(ResValue::as_array)
        .and_then(|s| s.first())
        .and_then(|s| s.get("children"))
        .and_then(|c| c.get("true"))
        .and_then(ResValue::as_array)
        .and_then(|t| t.get(1))
        .and_then(|g| g.get("children"))
        .and_then(|c| c.get("true"))
        .and_then(ResValue::as_array)
        .expect("columns");
    columns[col]
        .get("children")
        .and_then(|c| c.get("true"))
        .and_then(ResValue::as_array)
        .and_then(|flags| flags.get(row))
        .expect("flag event")
}

/// Ids of the events in one branch (`"true"` or `"false"`) of a flag event.
pub fn branch_ids(doc: &ResValue, col: usize, row: usize, branch: &str) -> Vec<String> {
    flag_event(doc, col, row)
        .get("children")
        .and_then(|c| c.get(branch))
        .and_then(ResValue::as_array)
        .expect("branch")
        .iter()
        .map(|e| e.get("id").and_then(ResValue::as_str).unwrap_or_default().to_string())
        .collect()
}

pub fn all_ids(doc: &ResValue) -> Vec<String> {
    let mut ids = Vec::new();
    doc.for_each_id(&mut |id| ids.push(id.to_string()));
    ids.sort();
    ids
}
