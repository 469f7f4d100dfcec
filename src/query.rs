//! List/view query options with a sparse-parameter encoding.
//!
//! Only parameters that carry a non-default value are written to the URL: some record stores
//! treat an empty `filter=` or `sort=` as a real filter, and `perPage=0` as a request for zero
//! items.

// self
use crate::_prelude::*;

/// Query options for list (all fields) and view (`fields` only) calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
	/// One-based page number; omitted when zero.
	pub page: u32,
	/// Page size (`perPage`); omitted when zero.
	pub size: u32,
	/// Filter expression, e.g. `status='ok'`; omitted when empty.
	pub filter: String,
	/// Sort expression, e.g. `-created`; omitted when empty.
	pub sort: String,
	/// Field selection, e.g. `id,title`; omitted when empty.
	pub fields: String,
	/// Sends `skipTotal=1` when set.
	pub skip_total: bool,
}
impl Params {
	/// Sets the page number.
	pub fn page(mut self, page: u32) -> Self {
		self.page = page;

		self
	}

	/// Sets the page size.
	pub fn size(mut self, size: u32) -> Self {
		self.size = size;

		self
	}

	/// Sets the filter expression.
	pub fn filter(mut self, filter: impl Into<String>) -> Self {
		self.filter = filter.into();

		self
	}

	/// Sets the sort expression.
	pub fn sort(mut self, sort: impl Into<String>) -> Self {
		self.sort = sort.into();

		self
	}

	/// Sets the field selection.
	pub fn fields(mut self, fields: impl Into<String>) -> Self {
		self.fields = fields.into();

		self
	}

	/// Skips the total-count query on the server.
	pub fn skip_total(mut self, skip: bool) -> Self {
		self.skip_total = skip;

		self
	}

	/// Appends the list parameters that carry a value to `url`.
	pub fn apply_list(&self, url: &mut Url) {
		let mut pairs = Vec::new();

		if self.page > 0 {
			pairs.push(("page", self.page.to_string()));
		}
		if self.size > 0 {
			pairs.push(("perPage", self.size.to_string()));
		}
		if !self.filter.is_empty() {
			pairs.push(("filter", self.filter.clone()));
		}
		if !self.sort.is_empty() {
			pairs.push(("sort", self.sort.clone()));
		}
		if !self.fields.is_empty() {
			pairs.push(("fields", self.fields.clone()));
		}
		if self.skip_total {
			pairs.push(("skipTotal", "1".into()));
		}

		append_pairs(url, &pairs);
	}

	/// Appends the view parameters (`fields`) when set.
	pub fn apply_view(&self, url: &mut Url) {
		if !self.fields.is_empty() {
			append_pairs(url, &[("fields", self.fields.clone())]);
		}
	}
}

fn append_pairs(url: &mut Url, pairs: &[(&str, String)]) {
	if pairs.is_empty() {
		return;
	}

	let mut query = url.query_pairs_mut();

	for (key, value) in pairs {
		query.append_pair(key, value);
	}
}
