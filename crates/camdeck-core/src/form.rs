//! Editable configuration form state.
//!
//! [`FormState`] is the text-and-checkbox snapshot a front end binds its
//! widgets to. Numeric fields are kept as strings so the operator can
//! clear them — blank means "unset", which travels as `null`; an absent
//! numeric must never render as a spurious `0`. `from_record` and
//! `to_update` are the only places field-by-field knowledge of the
//! config payload lives.

use camdeck_api::{ConfigUpdate, DeviceRecord};

/// Render an optional integer into a form field, blank when absent.
fn num_field(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Same, but with a device-firmware default for absent values.
fn num_field_or(value: Option<i64>, default: i64) -> String {
    value.unwrap_or(default).to_string()
}

/// Parse a form field back into an optional integer. Blank and
/// unparseable both read as "unset".
fn int_field(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// One device's editable configuration, as bound to input widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub framesize: String,
    pub jpeg_quality: String,
    pub upload_interval_sec: String,
    pub auto_upload: bool,
    pub upload_url: String,
    /// Write-only; never populated from a record.
    pub upload_token: String,

    pub whitebal: bool,
    pub wb_mode: String,
    pub hmirror: bool,
    pub vflip: bool,
    pub brightness: String,
    pub contrast: String,
    pub saturation: String,
    pub sharpness: String,
    pub awb_gain: bool,
    pub gain_ctrl: bool,
    pub exposure_ctrl: bool,
    pub gainceiling: String,
    pub ae_level: String,
    pub lens_corr: bool,
    pub raw_gma: bool,
    pub bpc: bool,
    pub wpc: bool,
    pub dcw: bool,
    pub colorbar: bool,
    pub special_effect: String,
    pub low_light_boost: bool,

    pub ai_host: String,
    pub ai_model: String,
    pub ai_prompt: String,
    pub ai_num_ctx: String,
    pub ai_num_predict: String,
}

impl FormState {
    /// Populate the form from a full device record.
    ///
    /// Sensor flags the firmware enables by default read as checked when
    /// the record predates the column; tuning levels default to the
    /// firmware's neutral values (0, gain ceiling 4).
    pub fn from_record(record: &DeviceRecord) -> Self {
        Self {
            framesize: record.framesize.clone().unwrap_or_default(),
            jpeg_quality: num_field(record.jpeg_quality),
            upload_interval_sec: num_field(record.upload_interval_sec),
            auto_upload: record.auto_upload.unwrap_or(false),
            upload_url: record.upload_url.clone().unwrap_or_default(),
            upload_token: String::new(),

            whitebal: record.whitebal.unwrap_or(true),
            wb_mode: num_field_or(record.wb_mode, 0),
            hmirror: record.hmirror.unwrap_or(false),
            vflip: record.vflip.unwrap_or(false),
            brightness: num_field_or(record.brightness, 0),
            contrast: num_field_or(record.contrast, 0),
            saturation: num_field_or(record.saturation, 0),
            sharpness: num_field_or(record.sharpness, 0),
            awb_gain: record.awb_gain.unwrap_or(true),
            gain_ctrl: record.gain_ctrl.unwrap_or(true),
            exposure_ctrl: record.exposure_ctrl.unwrap_or(true),
            gainceiling: num_field_or(record.gainceiling, 4),
            ae_level: num_field_or(record.ae_level, 0),
            lens_corr: record.lens_corr.unwrap_or(true),
            raw_gma: record.raw_gma.unwrap_or(true),
            bpc: record.bpc.unwrap_or(true),
            wpc: record.wpc.unwrap_or(true),
            dcw: record.dcw.unwrap_or(true),
            colorbar: record.colorbar.unwrap_or(false),
            special_effect: num_field_or(record.special_effect, 0),
            low_light_boost: record.low_light_boost.unwrap_or(true),

            ai_host: record.ai_host.clone().unwrap_or_default(),
            ai_model: record.ai_model.clone().unwrap_or_default(),
            ai_prompt: record.ai_prompt.clone().unwrap_or_default(),
            ai_num_ctx: num_field(record.ai_num_ctx),
            ai_num_predict: num_field(record.ai_num_predict),
        }
    }

    /// Build the submit payload.
    ///
    /// Host, model, and URL fields are trimmed; the prompt travels
    /// verbatim (leading/trailing whitespace can be intentional there).
    /// The token is included only when the operator typed one.
    pub fn to_update(&self) -> ConfigUpdate {
        let token = self.upload_token.trim();
        ConfigUpdate {
            framesize: self.framesize.trim().to_owned(),
            jpeg_quality: int_field(&self.jpeg_quality),
            upload_interval_sec: int_field(&self.upload_interval_sec),
            auto_upload: self.auto_upload,
            upload_url: self.upload_url.trim().to_owned(),
            upload_token: (!token.is_empty()).then(|| token.to_owned()),

            whitebal: self.whitebal,
            wb_mode: int_field(&self.wb_mode),
            hmirror: self.hmirror,
            vflip: self.vflip,
            brightness: int_field(&self.brightness),
            contrast: int_field(&self.contrast),
            saturation: int_field(&self.saturation),
            sharpness: int_field(&self.sharpness),
            awb_gain: self.awb_gain,
            gain_ctrl: self.gain_ctrl,
            exposure_ctrl: self.exposure_ctrl,
            gainceiling: int_field(&self.gainceiling),
            ae_level: int_field(&self.ae_level),
            lens_corr: self.lens_corr,
            raw_gma: self.raw_gma,
            bpc: self.bpc,
            wpc: self.wpc,
            dcw: self.dcw,
            colorbar: self.colorbar,
            special_effect: int_field(&self.special_effect),
            low_light_boost: self.low_light_boost,

            ai_host: self.ai_host.trim().to_owned(),
            ai_model: self.ai_model.trim().to_owned(),
            ai_prompt: self.ai_prompt.clone(),
            ai_num_ctx: int_field(&self.ai_num_ctx),
            ai_num_predict: int_field(&self.ai_num_predict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sparse_record_uses_firmware_defaults() {
        let record = DeviceRecord {
            device_id: "cam-01".into(),
            ..DeviceRecord::default()
        };
        let form = FormState::from_record(&record);

        // Absent numerics without a firmware default stay blank.
        assert_eq!(form.jpeg_quality, "");
        assert_eq!(form.ai_num_ctx, "");
        // Tuning levels default to neutral.
        assert_eq!(form.brightness, "0");
        assert_eq!(form.gainceiling, "4");
        // Firmware-on flags read as checked, others unchecked.
        assert!(form.whitebal);
        assert!(form.exposure_ctrl);
        assert!(!form.hmirror);
        assert!(!form.colorbar);
        assert!(!form.auto_upload);
        assert_eq!(form.upload_token, "");
    }

    #[test]
    fn zero_valued_numerics_are_not_blank() {
        let record = DeviceRecord {
            device_id: "cam-01".into(),
            jpeg_quality: Some(0),
            brightness: Some(-2),
            ..DeviceRecord::default()
        };
        let form = FormState::from_record(&record);
        assert_eq!(form.jpeg_quality, "0");
        assert_eq!(form.brightness, "-2");
    }

    #[test]
    fn token_never_populated_from_record() {
        let record = DeviceRecord {
            device_id: "cam-01".into(),
            upload_url: Some("http://sink/upload".into()),
            ..DeviceRecord::default()
        };
        let form = FormState::from_record(&record);
        assert_eq!(form.upload_token, "");
        assert_eq!(form.upload_url, "http://sink/upload");
    }

    #[test]
    fn blank_and_garbage_numerics_submit_as_unset() {
        let form = FormState {
            jpeg_quality: "  ".into(),
            upload_interval_sec: "ten".into(),
            brightness: "-1".into(),
            ..FormState::default()
        };
        let update = form.to_update();
        assert_eq!(update.jpeg_quality, None);
        assert_eq!(update.upload_interval_sec, None);
        assert_eq!(update.brightness, Some(-1));
    }

    #[test]
    fn submit_trims_addresses_but_not_prompt() {
        let form = FormState {
            ai_host: " http://ollama:11434 ".into(),
            ai_model: " llava ".into(),
            ai_prompt: "  describe the scene  ".into(),
            upload_url: " http://sink/upload ".into(),
            ..FormState::default()
        };
        let update = form.to_update();
        assert_eq!(update.ai_host, "http://ollama:11434");
        assert_eq!(update.ai_model, "llava");
        assert_eq!(update.ai_prompt, "  describe the scene  ");
        assert_eq!(update.upload_url, "http://sink/upload");
    }

    #[test]
    fn token_included_only_when_typed() {
        let mut form = FormState::default();
        assert_eq!(form.to_update().upload_token, None);

        form.upload_token = "   ".into();
        assert_eq!(form.to_update().upload_token, None);

        form.upload_token = " s3cret ".into();
        assert_eq!(form.to_update().upload_token, Some("s3cret".into()));
    }

    #[test]
    fn round_trip_preserves_edits() {
        let record = DeviceRecord {
            device_id: "cam-01".into(),
            framesize: Some("VGA".into()),
            jpeg_quality: Some(12),
            auto_upload: Some(true),
            ..DeviceRecord::default()
        };
        let mut form = FormState::from_record(&record);
        form.jpeg_quality = "10".into();
        form.vflip = true;

        let update = form.to_update();
        assert_eq!(update.framesize, "VGA");
        assert_eq!(update.jpeg_quality, Some(10));
        assert!(update.auto_upload);
        assert!(update.vflip);
    }
}
