// ── Server provider-configuration sync ──
//
// The control server keeps its own `mode -> {enabled, label}` map. The
// client's registry is authoritative for which modes exist; the server is
// authoritative for which are enabled. This module detects and repairs
// drift between the two and writes enable/disable changes back.

use std::collections::BTreeSet;

use critterdex_api::{ProviderConfig, ProviderSetting, ServerClient};

use crate::error::CoreError;
use crate::registry::ProviderRegistry;

// ── Pure helpers ────────────────────────────────────────────────────

/// Fallback display label: the mode with its first letter upper-cased.
pub fn derive_label(mode: &str) -> String {
    let mut chars = mode.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fail closed unless every registered mode has a server entry.
pub fn cross_validate(
    registry: &ProviderRegistry,
    config: &ProviderConfig,
) -> Result<(), CoreError> {
    let missing: Vec<String> = registry
        .modes()
        .filter(|mode| !config.contains_key(*mode))
        .map(str::to_owned)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ConfigMismatch { missing })
    }
}

/// Set every configured mode's `enabled` flag from membership in `enabled_modes`.
///
/// A mode the config does not know is an error naming every such mode, so
/// a typo never silently disables the mode it was meant to keep.
pub fn apply_enabled<S: AsRef<str>>(
    config: &ProviderConfig,
    enabled_modes: &[S],
) -> Result<ProviderConfig, CoreError> {
    let wanted: BTreeSet<&str> = enabled_modes.iter().map(AsRef::as_ref).collect();
    let unknown: Vec<&str> = wanted
        .iter()
        .copied()
        .filter(|mode| !config.contains_key(*mode))
        .collect();
    if !unknown.is_empty() {
        return Err(CoreError::UnknownMode {
            mode: unknown.join(", "),
        });
    }

    let updated: ProviderConfig = config
        .iter()
        .map(|(mode, setting)| {
            let setting = ProviderSetting {
                enabled: wanted.contains(mode.as_str()),
                ..setting.clone()
            };
            (mode.clone(), setting)
        })
        .collect();

    if updated.values().any(|s| s.enabled) {
        Ok(updated)
    } else {
        Err(CoreError::NoProviderEnabled)
    }
}

// ── Drift ───────────────────────────────────────────────────────────

/// Set difference between registered modes and server-configured modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drift {
    /// Registered here, absent on the server.
    pub missing: BTreeSet<String>,
    /// On the server, unknown here.
    pub extra: BTreeSet<String>,
}

impl Drift {
    pub fn between<'a>(
        registry_modes: impl IntoIterator<Item = &'a str>,
        config: &ProviderConfig,
    ) -> Self {
        let registered: BTreeSet<String> = registry_modes.into_iter().map(str::to_owned).collect();
        let served: BTreeSet<String> = config.keys().cloned().collect();
        Self {
            missing: registered.difference(&served).cloned().collect(),
            extra: served.difference(&registered).cloned().collect(),
        }
    }

    pub fn is_in_sync(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }

    /// `config` with missing modes added (disabled) and extra modes removed.
    pub fn reconcile(
        &self,
        config: &ProviderConfig,
        registry: &ProviderRegistry,
    ) -> ProviderConfig {
        let mut reconciled: ProviderConfig = config
            .iter()
            .filter(|(mode, _)| !self.extra.contains(*mode))
            .map(|(mode, setting)| (mode.clone(), setting.clone()))
            .collect();

        for mode in &self.missing {
            let label = registry
                .resolve(mode)
                .map_or_else(|_| derive_label(mode), |p| p.label().to_owned());
            reconciled.insert(mode.clone(), ProviderSetting::new(false, label));
        }
        reconciled
    }
}

/// Result of [`ProviderSync::synchronize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    InSync,
    /// Drift was found and the confirmation step said no. Nothing was sent.
    Declined(Drift),
    /// The reconciled map that was saved.
    Synchronized(ProviderConfig),
}

// ── ProviderSync ────────────────────────────────────────────────────

/// Server-facing half of provider configuration.
#[derive(Debug, Clone, Copy)]
pub struct ProviderSync<'a> {
    pub server: &'a ServerClient,
    pub registry: &'a ProviderRegistry,
}

impl<'a> ProviderSync<'a> {
    pub fn new(server: &'a ServerClient, registry: &'a ProviderRegistry) -> Self {
        Self { server, registry }
    }

    pub async fn fetch_config(&self) -> Result<ProviderConfig, CoreError> {
        Ok(self.server.providers().await?)
    }

    /// Enabled `(mode, label)` pairs for the mode picker, in server order.
    ///
    /// Errors with `ConfigMismatch` if the server lacks any registered mode.
    pub async fn selectable_modes(&self) -> Result<Vec<(String, String)>, CoreError> {
        let config = self.fetch_config().await?;
        cross_validate(self.registry, &config)?;
        Ok(config
            .into_iter()
            .filter(|(_, setting)| setting.enabled)
            .map(|(mode, setting)| {
                let label = setting.label.unwrap_or_else(|| derive_label(&mode));
                (mode, label)
            })
            .collect())
    }

    /// Compare the server map with the registry and, if `confirm` agrees,
    /// save the reconciled map.
    pub async fn synchronize<F>(&self, confirm: F) -> Result<SyncOutcome, CoreError>
    where
        F: FnOnce(&Drift) -> bool,
    {
        let config = self.fetch_config().await?;
        let drift = Drift::between(self.registry.modes(), &config);
        if drift.is_in_sync() {
            return Ok(SyncOutcome::InSync);
        }

        tracing::info!(
            missing = ?drift.missing,
            extra = ?drift.extra,
            "provider configuration drift"
        );
        if !confirm(&drift) {
            return Ok(SyncOutcome::Declined(drift));
        }

        let reconciled = drift.reconcile(&config, self.registry);
        self.server.save_providers(&reconciled).await?;
        Ok(SyncOutcome::Synchronized(reconciled))
    }

    /// Enable exactly `enabled_modes`, disable the rest, and save.
    ///
    /// Nothing is sent if the result would have no enabled provider.
    pub async fn save_settings<S: AsRef<str>>(
        &self,
        enabled_modes: &[S],
    ) -> Result<ProviderConfig, CoreError> {
        let current = self.fetch_config().await?;
        let updated = apply_enabled(&current, enabled_modes)?;
        self.server.save_providers(&updated).await?;
        Ok(updated)
    }
}
